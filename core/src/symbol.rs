use std::fmt;

/// One per-frame classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// DTMF or MF digit 0-9
    Digit(u8),
    Star,
    Pound,
    /// DTMF letters A-D, 0 = A
    Letter(u8),
    C11,
    C12,
    Kp1,
    Kp2,
    St,
    Tone2400,
    Tone2600,
    Tone2400And2600,
    DialTone,
    Ring,
    Busy,
    Silence,
    /// No coherent tone this frame
    Invalid,
}

impl Symbol {
    /// Every symbol except `Invalid`, in the classic numbering order.
    pub const ALL: [Symbol; 28] = [
        Symbol::Digit(0),
        Symbol::Digit(1),
        Symbol::Digit(2),
        Symbol::Digit(3),
        Symbol::Digit(4),
        Symbol::Digit(5),
        Symbol::Digit(6),
        Symbol::Digit(7),
        Symbol::Digit(8),
        Symbol::Digit(9),
        Symbol::Star,
        Symbol::Pound,
        Symbol::Letter(0),
        Symbol::Letter(1),
        Symbol::Letter(2),
        Symbol::Letter(3),
        Symbol::C11,
        Symbol::C12,
        Symbol::Kp1,
        Symbol::Kp2,
        Symbol::St,
        Symbol::Tone2400,
        Symbol::Tone2600,
        Symbol::Tone2400And2600,
        Symbol::DialTone,
        Symbol::Ring,
        Symbol::Busy,
        Symbol::Silence,
    ];

    /// Text written to the output for this symbol.
    pub fn display_text(self) -> &'static str {
        const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        const LETTERS: [&str; 4] = ["A", "B", "C", "D"];

        match self {
            Symbol::Digit(d) => DIGITS.get(d as usize).copied().unwrap_or(""),
            Symbol::Star => "*",
            Symbol::Pound => "#",
            Symbol::Letter(l) => LETTERS.get(l as usize).copied().unwrap_or(""),
            Symbol::C11 => "+C11 ",
            Symbol::C12 => "+C12 ",
            Symbol::Kp1 => " KP1+",
            Symbol::Kp2 => " KP2+",
            Symbol::St => "+ST ",
            Symbol::Tone2400 => " 2400 ",
            Symbol::Tone2600 => " 2600 ",
            Symbol::Tone2400And2600 => " 2400+2600 ",
            Symbol::DialTone => " DIALTONE ",
            Symbol::Ring => " RING ",
            Symbol::Busy => " BUSY ",
            Symbol::Silence | Symbol::Invalid => "",
        }
    }

    /// 2400 Hz, 2600 Hz or both.
    pub fn is_supervisory(self) -> bool {
        matches!(
            self,
            Symbol::Tone2400 | Symbol::Tone2600 | Symbol::Tone2400And2600
        )
    }

    pub fn is_call_progress(self) -> bool {
        matches!(self, Symbol::DialTone | Symbol::Ring | Symbol::Busy)
    }

    /// Conditions that may be held indefinitely. A new symbol following one
    /// of these is always reported.
    pub fn is_held_condition(self) -> bool {
        self == Symbol::Silence || self.is_supervisory() || self.is_call_progress()
    }

    /// Map a keypad character to its DTMF symbol.
    pub fn from_key(c: char) -> Option<Symbol> {
        match c {
            '0'..='9' => Some(Symbol::Digit(c as u8 - b'0')),
            '*' => Some(Symbol::Star),
            '#' => Some(Symbol::Pound),
            'A'..='D' => Some(Symbol::Letter(c as u8 - b'A')),
            'a'..='d' => Some(Symbol::Letter(c as u8 - b'a')),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Silence => write!(f, "<silence>"),
            Symbol::Invalid => write!(f, "<invalid>"),
            other => write!(f, "{}", other.display_text().trim()),
        }
    }
}
