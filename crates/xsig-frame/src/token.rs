use std::fmt;

/// The signal type a token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Digital,
    Analog,
    Serial,
}

impl TokenKind {
    /// Lowercase name used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Digital => "digital",
            TokenKind::Analog => "analog",
            TokenKind::Serial => "serial",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignalValue {
    Digital(bool),
    Analog(u16),
    /// Text restricted to characters `U+0000..=U+00FE`; checked when encoded.
    Serial(String),
}

impl SignalValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            SignalValue::Digital(_) => TokenKind::Digital,
            SignalValue::Analog(_) => TokenKind::Analog,
            SignalValue::Serial(_) => TokenKind::Serial,
        }
    }
}

/// One signal update: a join number plus a typed value.
///
/// Tokens are immutable once built. Offsetting for the wire happens in the
/// codec, so the same token can be encoded into different join ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    index: u16,
    value: SignalValue,
}

impl Token {
    /// Create a token from a join number and a value.
    pub fn new(index: u16, value: SignalValue) -> Self {
        Self { index, value }
    }

    /// Create a digital token.
    pub fn digital(index: u16, value: bool) -> Self {
        Self::new(index, SignalValue::Digital(value))
    }

    /// Create an analog token.
    pub fn analog(index: u16, value: u16) -> Self {
        Self::new(index, SignalValue::Analog(value))
    }

    /// Create a serial token.
    pub fn serial(index: u16, value: impl Into<String>) -> Self {
        Self::new(index, SignalValue::Serial(value.into()))
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }

    pub fn value(&self) -> &SignalValue {
        &self.value
    }

    /// Consume the token and return its value.
    pub fn into_value(self) -> SignalValue {
        self.value
    }

    /// The digital value, if this is a digital token.
    pub fn as_digital(&self) -> Option<bool> {
        match self.value {
            SignalValue::Digital(v) => Some(v),
            _ => None,
        }
    }

    /// The analog value, if this is an analog token.
    pub fn as_analog(&self) -> Option<u16> {
        match self.value {
            SignalValue::Analog(v) => Some(v),
            _ => None,
        }
    }

    /// The serial value, if this is a serial token.
    pub fn as_serial(&self) -> Option<&str> {
        match &self.value {
            SignalValue::Serial(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            SignalValue::Digital(v) => write!(f, "digital[{}]={}", self.index, v),
            SignalValue::Analog(v) => write!(f, "analog[{}]={}", self.index, v),
            SignalValue::Serial(v) => write!(f, "serial[{}]={:?}", self.index, v),
        }
    }
}
