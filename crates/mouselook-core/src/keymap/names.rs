//! Display names for keybinds.
//!
//! # How names are resolved
//!
//! Letters and digits are asked of the layout directly, so they follow the
//! user's keyboard layout (`Q` on AZERTY shows as `A`).  Every other key is
//! looked up in a [`ScanCodeNames`] table that is built the first time a
//! keybind is rendered, by asking the layout for the name of each of the 256
//! scan codes, first in plain form and then in extended (`0xE0xx`) form.
//! After construction the table is never written again, so it can be read
//! from any thread without locking.
//!
//! Rendered strings are upper-case and list modifiers in Alt, Ctrl, Shift
//! order before the primary key, e.g. `ALT + SHIFT + F`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::domain::keybind::Keybind;
use crate::keymap::virtual_keys::{is_alphanumeric, VK_CONTROL, VK_MENU, VK_SHIFT};
use crate::keymap::KeyboardLayout;
use crate::protocol::keystroke::{KeystrokeParams, EXTENDED_SCAN_PREFIX};

/// Placeholder shown for a chord with neither key nor modifiers.
pub const NULL_LABEL: &str = "(null)";

const PADDED_SEPARATOR: &str = " + ";
const COMPACT_SEPARATOR: &str = "+";

/// Immutable scan code → key name table.
#[derive(Debug, Default)]
pub struct ScanCodeNames {
    names: HashMap<u16, String>,
}

impl ScanCodeNames {
    /// Queries `layout` for every scan code.
    ///
    /// Entries are keyed by the full scan code, so `0x1D` (left Ctrl) and
    /// `0xE01D` (right Ctrl) are distinct.  The extended pass runs second and
    /// overwrites on collision.  Keys the layout cannot name are left out.
    pub fn build(layout: &dyn KeyboardLayout) -> Self {
        let mut names = HashMap::new();
        for prefix in [0u16, EXTENDED_SCAN_PREFIX] {
            for low in 0u16..=0xFF {
                let scan_code = prefix | low;
                let params = KeystrokeParams::for_name_lookup(scan_code).pack();
                if let Some(name) = layout.key_name(params).filter(|n| !n.is_empty()) {
                    names.insert(scan_code, name);
                }
            }
        }
        debug!(entries = names.len(), "built scan code name table");
        Self { names }
    }

    pub fn get(&self, scan_code: u16) -> Option<&str> {
        self.names.get(&scan_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Renders [`Keybind`]s for the settings panel.
pub struct KeybindFormatter {
    layout: Arc<dyn KeyboardLayout>,
    names: OnceLock<ScanCodeNames>,
}

impl KeybindFormatter {
    pub fn new(layout: Arc<dyn KeyboardLayout>) -> Self {
        Self {
            layout,
            names: OnceLock::new(),
        }
    }

    /// The scan-code table, built on first use.
    pub fn names(&self) -> &ScanCodeNames {
        self.names.get_or_init(|| ScanCodeNames::build(self.layout.as_ref()))
    }

    /// Renders `chord`.  `padded` selects `" + "` over `"+"` between parts.
    pub fn render(&self, chord: &Keybind, padded: bool) -> String {
        if chord.is_empty() {
            return NULL_LABEL.to_string();
        }

        let mut parts = Vec::with_capacity(4);
        if chord.alt {
            parts.push(self.modifier_name(VK_MENU, "ALT"));
        }
        if chord.ctrl {
            parts.push(self.modifier_name(VK_CONTROL, "CTRL"));
        }
        if chord.shift {
            parts.push(self.modifier_name(VK_SHIFT, "SHIFT"));
        }
        if chord.is_bound() {
            parts.push(self.primary_key_name(chord.key));
        }

        let separator = if padded {
            PADDED_SEPARATOR
        } else {
            COMPACT_SEPARATOR
        };
        parts.join(separator).to_uppercase()
    }

    /// Name of a primary key, falling back to its hex scan code.
    pub fn primary_key_name(&self, scan_code: u16) -> String {
        let virtual_key = self.layout.scan_to_virtual_key(scan_code);
        let name = if is_alphanumeric(virtual_key) {
            self.layout
                .key_name(KeystrokeParams::for_name_lookup(scan_code).pack())
        } else {
            self.names().get(scan_code).map(str::to_owned)
        };
        name.filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("0x{scan_code:04X}"))
    }

    fn modifier_name(&self, virtual_key: u32, fallback: &str) -> String {
        let scan_code = self.layout.virtual_key_to_scan(virtual_key);
        self.layout
            .key_name(KeystrokeParams::for_name_lookup(scan_code).pack())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
