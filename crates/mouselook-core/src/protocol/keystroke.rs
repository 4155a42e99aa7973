//! The legacy keystroke parameter block carried in `lParam` of keyboard
//! window messages.
//!
//! Bit layout (least significant bit first):
//! ```text
//! bits  0–15  repeat count
//! bits 16–23  scan code (low byte)
//! bit  24     extended key
//! bits 25–28  reserved
//! bit  29     context code (Alt held)
//! bit  30     previous key state (1 = was down)
//! bit  31     transition state (1 = being released)
//! ```
//!
//! The block is packed and unpacked with explicit shifts and masks rather
//! than by reinterpreting the integer as a bitfield struct.

/// High-byte prefix that marks an extended scan code (`0xE0xx`).
pub const EXTENDED_SCAN_PREFIX: u16 = 0xE000;

pub const REPEAT_COUNT_OFFSET: u32 = 0;
pub const REPEAT_COUNT_WIDTH: u32 = 16;
pub const SCAN_CODE_OFFSET: u32 = 16;
pub const SCAN_CODE_WIDTH: u32 = 8;
pub const EXTENDED_OFFSET: u32 = 24;
pub const CONTEXT_CODE_OFFSET: u32 = 29;
pub const PREVIOUS_STATE_OFFSET: u32 = 30;
pub const TRANSITION_STATE_OFFSET: u32 = 31;

/// Returns `true` when `scan_code` carries the extended prefix.
pub fn is_extended_scan(scan_code: u16) -> bool {
    (scan_code & EXTENDED_SCAN_PREFIX) != 0
}

/// Unpacked view of a keystroke parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeystrokeParams {
    pub repeat_count: u16,
    pub scan_code: u8,
    pub extended: bool,
    pub context_code: bool,
    pub previous_state: bool,
    pub transition_state: bool,
}

impl KeystrokeParams {
    /// Parameters for a synthesized key-down (`key_up == false`) or key-up.
    ///
    /// Repeat count is 1; the previous-state and transition bits both mirror
    /// the direction, as they do for a non-repeating physical keystroke.
    pub fn for_keystroke(scan_code: u16, key_up: bool) -> Self {
        Self {
            repeat_count: 1,
            scan_code: (scan_code & 0xFF) as u8,
            extended: is_extended_scan(scan_code),
            context_code: false,
            previous_state: key_up,
            transition_state: key_up,
        }
    }

    /// Parameters that identify a key for a name lookup: scan code and
    /// extended bit only.
    pub fn for_name_lookup(scan_code: u16) -> Self {
        Self {
            scan_code: (scan_code & 0xFF) as u8,
            extended: is_extended_scan(scan_code),
            ..Self::default()
        }
    }

    pub fn pack(&self) -> u32 {
        let mut raw = (u32::from(self.repeat_count) & mask(REPEAT_COUNT_WIDTH)) << REPEAT_COUNT_OFFSET;
        raw |= (u32::from(self.scan_code) & mask(SCAN_CODE_WIDTH)) << SCAN_CODE_OFFSET;
        raw |= u32::from(self.extended) << EXTENDED_OFFSET;
        raw |= u32::from(self.context_code) << CONTEXT_CODE_OFFSET;
        raw |= u32::from(self.previous_state) << PREVIOUS_STATE_OFFSET;
        raw |= u32::from(self.transition_state) << TRANSITION_STATE_OFFSET;
        raw
    }

    /// Decodes a raw block.  Reserved bits are ignored.
    pub fn unpack(raw: u32) -> Self {
        Self {
            repeat_count: field(raw, REPEAT_COUNT_OFFSET, REPEAT_COUNT_WIDTH) as u16,
            scan_code: field(raw, SCAN_CODE_OFFSET, SCAN_CODE_WIDTH) as u8,
            extended: field(raw, EXTENDED_OFFSET, 1) != 0,
            context_code: field(raw, CONTEXT_CODE_OFFSET, 1) != 0,
            previous_state: field(raw, PREVIOUS_STATE_OFFSET, 1) != 0,
            transition_state: field(raw, TRANSITION_STATE_OFFSET, 1) != 0,
        }
    }

    /// Scan code with the `0xE000` prefix restored for extended keys.
    pub fn full_scan_code(&self) -> u16 {
        let scan = u16::from(self.scan_code);
        if self.extended {
            scan | EXTENDED_SCAN_PREFIX
        } else {
            scan
        }
    }
}

fn mask(width: u32) -> u32 {
    (1u32 << width) - 1
}

fn field(raw: u32, offset: u32, width: u32) -> u32 {
    (raw >> offset) & mask(width)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
