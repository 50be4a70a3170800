use serde::{Deserialize, Serialize};

/// Visibility marker carried by a decrypted record value (`.private`, `.public`, `.constant`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Private,
    Public,
    Constant,
    /// No marker present
    Plain,
}

impl Visibility {
    const MARKED: [Visibility; 3] = [Visibility::Private, Visibility::Public, Visibility::Constant];

    /// The trailing marker text, including the leading dot.
    pub fn marker(self) -> &'static str {
        match self {
            Visibility::Private => ".private",
            Visibility::Public => ".public",
            Visibility::Constant => ".constant",
            Visibility::Plain => "",
        }
    }
}

/// Integer width class, identified by its type suffix (`u64`, `i32`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegerWidth {
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
}

impl IntegerWidth {
    pub const ALL: [IntegerWidth; 10] = [
        IntegerWidth::U8,
        IntegerWidth::U16,
        IntegerWidth::U32,
        IntegerWidth::U64,
        IntegerWidth::U128,
        IntegerWidth::I8,
        IntegerWidth::I16,
        IntegerWidth::I32,
        IntegerWidth::I64,
        IntegerWidth::I128,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            IntegerWidth::U8 => "u8",
            IntegerWidth::U16 => "u16",
            IntegerWidth::U32 => "u32",
            IntegerWidth::U64 => "u64",
            IntegerWidth::U128 => "u128",
            IntegerWidth::I8 => "i8",
            IntegerWidth::I16 => "i16",
            IntegerWidth::I32 => "i32",
            IntegerWidth::I64 => "i64",
            IntegerWidth::I128 => "i128",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntegerWidth::I8
                | IntegerWidth::I16
                | IntegerWidth::I32
                | IntegerWidth::I64
                | IntegerWidth::I128
        )
    }
}

/// What a tagged value denotes once its suffixes are understood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Integer(IntegerWidth),
    Address,
    Bool,
    Field,
    /// Anything else; the value is kept verbatim
    Opaque,
}

/// A tagged literal as the wallet renders it, e.g. `1000u64.private`.
///
/// Parsing never fails: unrecognized text becomes an [`LiteralKind::Opaque`]
/// literal whose value is the input minus any visibility marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub visibility: Visibility,
    /// Bare value with every suffix removed
    pub value: String,
}

impl Literal {
    pub fn parse(raw: &str) -> Self {
        let (kind, visibility, value) = split(raw);
        Self {
            kind,
            visibility,
            value: value.to_string(),
        }
    }

    pub fn integer(width: IntegerWidth, value: impl std::fmt::Display) -> Self {
        Self {
            kind: LiteralKind::Integer(width),
            visibility: Visibility::Plain,
            value: value.to_string(),
        }
    }

    pub fn field(value: impl Into<String>) -> Self {
        Self {
            kind: LiteralKind::Field,
            visibility: Visibility::Plain,
            value: value.into(),
        }
    }

    pub fn address(value: impl Into<String>) -> Self {
        Self {
            kind: LiteralKind::Address,
            visibility: Visibility::Plain,
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            kind: LiteralKind::Bool,
            visibility: Visibility::Plain,
            value: value.to_string(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Render as a transition input: value plus type suffix, no visibility marker.
    pub fn encode(&self) -> String {
        match self.kind {
            LiteralKind::Integer(width) => format!("{}{}", self.value, width.suffix()),
            LiteralKind::Field => format!("{}field", self.value),
            LiteralKind::Address | LiteralKind::Bool | LiteralKind::Opaque => self.value.clone(),
        }
    }

    /// Render in the full record form, e.g. `5u8.private`.
    pub fn encode_tagged(&self) -> String {
        format!("{}{}", self.encode(), self.visibility.marker())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode_tagged())
    }
}

/// Strip every type and visibility suffix, returning the bare value.
///
/// Idempotent: `clean(clean(x)) == clean(x)`.
pub fn clean(raw: &str) -> &str {
    split(raw).2
}

fn split(raw: &str) -> (LiteralKind, Visibility, &str) {
    let (body, visibility) = split_visibility(raw.trim());

    if let Some((digits, width)) = split_integer(body) {
        return (LiteralKind::Integer(width), visibility, digits);
    }
    if let Some(digits) = body.strip_suffix("field") {
        if is_digits(digits) {
            return (LiteralKind::Field, visibility, digits);
        }
    }
    match body {
        "true" | "false" => (LiteralKind::Bool, visibility, body),
        _ if body.starts_with("aleo1") => (LiteralKind::Address, visibility, body),
        _ => (LiteralKind::Opaque, visibility, body),
    }
}

fn split_visibility(raw: &str) -> (&str, Visibility) {
    let mut body = raw;
    let mut outermost = Visibility::Plain;
    // Repeated markers collapse so cleaning stays idempotent.
    'strip: loop {
        for visibility in Visibility::MARKED {
            if let Some(rest) = body.strip_suffix(visibility.marker()) {
                if outermost == Visibility::Plain {
                    outermost = visibility;
                }
                body = rest.trim_end();
                continue 'strip;
            }
        }
        break;
    }
    (body, outermost)
}

fn split_integer(body: &str) -> Option<(&str, IntegerWidth)> {
    IntegerWidth::ALL.into_iter().find_map(|width| {
        let digits = body.strip_suffix(width.suffix())?;
        let unsigned = if width.is_signed() {
            digits.strip_prefix('-').unwrap_or(digits)
        } else {
            digits
        };
        is_digits(unsigned).then_some((digits, width))
    })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_private_integers() {
        let lit = Literal::parse("1000u64.private");
        assert_eq!(lit.kind, LiteralKind::Integer(IntegerWidth::U64));
        assert_eq!(lit.visibility, Visibility::Private);
        assert_eq!(lit.value, "1000");

        assert_eq!(Literal::parse("7u8.public").kind, LiteralKind::Integer(IntegerWidth::U8));
        assert_eq!(Literal::parse("5u128.private").value, "5");
        assert_eq!(Literal::parse("-12i64.private").value, "-12");
    }

    #[test]
    fn unsigned_widths_reject_negative_values() {
        let lit = Literal::parse("-12u64.private");
        assert_eq!(lit.kind, LiteralKind::Opaque);
        assert_eq!(lit.value, "-12u64");
    }

    #[test]
    fn parses_addresses_bools_and_fields() {
        let addr = Literal::parse("aleo1abc.private");
        assert_eq!(addr.kind, LiteralKind::Address);
        assert_eq!(addr.value, "aleo1abc");

        let flag = Literal::parse("true.private");
        assert_eq!(flag.kind, LiteralKind::Bool);
        assert_eq!(flag.as_bool(), Some(true));

        let field = Literal::parse("12345field.private");
        assert_eq!(field.kind, LiteralKind::Field);
        assert_eq!(field.value, "12345");
    }

    #[test]
    fn unknown_text_is_opaque() {
        let lit = Literal::parse("1group.private");
        assert_eq!(lit.kind, LiteralKind::Opaque);
        assert_eq!(lit.value, "1group");
        assert_eq!(Literal::parse("").value, "");
    }

    #[test]
    fn clean_is_noop_on_clean_input() {
        assert_eq!(clean("1000"), "1000");
        assert_eq!(clean("aleo1xyz"), "aleo1xyz");
        assert_eq!(clean("false"), "false");
    }

    #[test]
    fn repeated_markers_collapse() {
        assert_eq!(clean("5u64.private.private"), "5");
        assert_eq!(Literal::parse("5u64.public.private").visibility, Visibility::Private);
    }

    #[test]
    fn encode_drops_visibility() {
        let lit = Literal::parse("42u32.private");
        assert_eq!(lit.encode(), "42u32");
        assert_eq!(lit.encode_tagged(), "42u32.private");
        assert_eq!(Literal::field("9").encode(), "9field");
        assert_eq!(Literal::boolean(false).encode(), "false");
        assert_eq!(Literal::address("aleo1q").encode(), "aleo1q");
    }

    fn width_strategy() -> impl Strategy<Value = IntegerWidth> {
        prop_oneof![
            Just(IntegerWidth::U64),
            Just(IntegerWidth::U128),
            Just(IntegerWidth::I128),
        ]
    }

    proptest! {
        #[test]
        fn tagged_integers_round_trip(n in any::<u64>(), width in width_strategy()) {
            let tagged = Literal::integer(width, n)
                .with_visibility(Visibility::Private)
                .encode_tagged();
            let parsed: u64 = clean(&tagged).parse().unwrap();
            prop_assert_eq!(parsed, n);
            prop_assert_eq!(Literal::parse(&tagged).kind, LiteralKind::Integer(width));
        }

        #[test]
        fn clean_is_idempotent(raw in "[a-z0-9.\\-]{0,24}") {
            let once = clean(&raw);
            prop_assert_eq!(clean(once), once);
        }
    }
}
