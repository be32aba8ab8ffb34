//! Enumeration types for the Bazaar simulation.
//!
//! Catalog items, customer variants, the fixed input key set, and the
//! presentation enums the renderer switches on.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// An item the shop can sell.
///
/// The catalog is static: three contraband goods bound to the digit keys
/// 1 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Item {
    /// Military grade cloaking technology.
    CloakingDevice,
    /// Forged identification documents.
    FakeId,
    /// Probability-manipulating gaming equipment.
    QuantumDice,
}

impl Item {
    /// Every catalog item, in digit-key order.
    pub const ALL: [Self; 3] = [Self::CloakingDevice, Self::FakeId, Self::QuantumDice];

    /// Human-readable item name as customers ask for it.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CloakingDevice => "Cloaking Device",
            Self::FakeId => "Fake ID",
            Self::QuantumDice => "Quantum Dice",
        }
    }

    /// Single-character glyph used by the ASCII renderer.
    pub const fn symbol(self) -> char {
        match self {
            Self::CloakingDevice => '$',
            Self::FakeId => '%',
            Self::QuantumDice => '&',
        }
    }

    /// Flavour text shown in the inventory panel.
    pub const fn description(self) -> &'static str {
        match self {
            Self::CloakingDevice => "Military grade cloaking technology",
            Self::FakeId => "Forged identification documents",
            Self::QuantumDice => "Probability-manipulating gaming equipment",
        }
    }

    /// Catalog list price. Display only: negotiations use the customer's
    /// base price.
    pub const fn list_price(self) -> u32 {
        match self {
            Self::CloakingDevice => 100,
            Self::FakeId => 50,
            Self::QuantumDice => 75,
        }
    }

    /// Digit key that selects this item.
    pub const fn digit(self) -> u8 {
        match self {
            Self::CloakingDevice => 1,
            Self::FakeId => 2,
            Self::QuantumDice => 3,
        }
    }

    /// Look up the item bound to a digit key (1-based).
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::CloakingDevice),
            2 => Some(Self::FakeId),
            3 => Some(Self::QuantumDice),
            _ => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// Visual and behavioural variant of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CustomerKind {
    /// Variant A.
    Tentacle,
    /// Variant B.
    Blob,
    /// Variant C.
    Crystal,
}

impl CustomerKind {
    /// Every variant, used for uniform selection at creation.
    pub const ALL: [Self; 3] = [Self::Tentacle, Self::Blob, Self::Crystal];

    /// Glyph drawn for this customer.
    pub const fn symbol(self) -> char {
        match self {
            Self::Tentacle => 'A',
            Self::Blob => 'B',
            Self::Crystal => 'C',
        }
    }

    /// Colour class the renderer applies to the glyph.
    pub const fn color(self) -> ColorClass {
        match self {
            Self::Tentacle => ColorClass::Cyan,
            Self::Blob => ColorClass::Green,
            Self::Crystal => ColorClass::Yellow,
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Colour classes understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ColorClass {
    /// Positive feedback, calm patience.
    Green,
    /// Tentacle customers.
    Cyan,
    /// Crystal customers, waning patience.
    Yellow,
    /// Failures, exhausted patience.
    Red,
    /// Default text.
    White,
}

/// Tone of the speech bubble above a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MessageTone {
    /// Ordinary request text.
    #[default]
    Neutral,
    /// Sale completed or haggle won.
    Positive,
    /// Abandonment, wrong item, or lost haggle.
    Negative,
    /// A haggle round is waiting for a key.
    Haggle,
}

/// What a flash indicator highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FlashTarget {
    /// The money counter in the status bar.
    Money,
    /// The reputation counter in the status bar.
    Reputation,
    /// A border around the whole shop.
    Screen,
}

/// Phase of the current trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TradingPhase {
    /// Shop closed; ENTER opens it.
    Preparation,
    /// Customers spawn and the trading window counts down.
    Trading,
    /// Trading window elapsed; the day summary is on screen.
    EndOfDay,
}

/// Category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LedgerEntryKind {
    /// Money credited for a completed sale.
    SaleCredit,
    /// Money debited for end-of-day interest.
    InterestPayment,
    /// Reputation adjustment (positive or negative).
    Reputation,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The five-letter haggle alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum HaggleKey {
    /// The `Z` key.
    Z,
    /// The `X` key.
    X,
    /// The `C` key.
    C,
    /// The `V` key.
    V,
    /// The `B` key.
    B,
}

impl HaggleKey {
    /// Every haggle key, used for uniform selection.
    pub const ALL: [Self; 5] = [Self::Z, Self::X, Self::C, Self::V, Self::B];

    /// Character printed on the key.
    pub const fn as_char(self) -> char {
        match self {
            Self::Z => 'Z',
            Self::X => 'X',
            Self::C => 'C',
            Self::V => 'V',
            Self::B => 'B',
        }
    }

    /// Map an upper- or lower-case letter to a haggle key.
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'Z' => Some(Self::Z),
            'X' => Some(Self::X),
            'C' => Some(Self::C),
            'V' => Some(Self::V),
            'B' => Some(Self::B),
            _ => None,
        }
    }
}

impl fmt::Display for HaggleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single discrete key token delivered by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum InputKey {
    /// Digit key 1-3: select an item from the catalog.
    Digit(u8),
    /// SPACE: attempt a sale with the selected item.
    Space,
    /// TAB: cycle the active customer.
    Tab,
    /// ENTER: open the shop or advance to the next day.
    Enter,
    /// ESC: clear the selected item.
    Esc,
    /// One of the haggle alphabet letters.
    Haggle(HaggleKey),
}

/// Error returned when a host key token is outside the fixed key set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised key token: {token}")]
pub struct ParseKeyError {
    /// The token that could not be mapped.
    pub token: String,
}

impl FromStr for InputKey {
    type Err = ParseKeyError;

    /// Parse the host shell's key names (`"1"`, `"SPACE"`, `"TAB"`,
    /// `"ENTER"`, `"ESC"`, or a haggle letter). Matching is
    /// case-insensitive.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let upper = token.trim().to_ascii_uppercase();
        let key = match upper.as_str() {
            "1" => Some(Self::Digit(1)),
            "2" => Some(Self::Digit(2)),
            "3" => Some(Self::Digit(3)),
            "SPACE" => Some(Self::Space),
            "TAB" => Some(Self::Tab),
            "ENTER" => Some(Self::Enter),
            "ESC" | "ESCAPE" => Some(Self::Esc),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => HaggleKey::from_char(c).map(Self::Haggle),
                    _ => None,
                }
            }
        };
        key.ok_or(ParseKeyError {
            token: token.to_owned(),
        })
    }
}
