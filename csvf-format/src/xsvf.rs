use std::fmt::Display;

/// Number of bytes needed to hold `bits` bits.
pub const fn bits_to_bytes(bits: u32) -> usize {
    bits.div_ceil(8) as usize
}

/// The command bytes of the XSVF format as defined by Xilinx XAPP503.
///
/// Only a subset of these can be converted, see [`Opcode::is_supported`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// End of the program.
    XCOMPLETE = 0x00,
    /// Sets the mask applied to TDO values of subsequent compares.
    XTDOMASK = 0x01,
    /// Shifts a bit-sequence of up to 255 bits into the instruction register.
    XSIR = 0x02,
    XSDR = 0x03,
    /// Number of clocks (or microseconds) to spend in Run-Test/Idle after a shift.
    XRUNTEST = 0x04,
    XREPEAT = 0x07,
    /// Sets the length in bits of all following data register shifts.
    XSDRSIZE = 0x08,
    /// Shifts data into the data register and compares the result against an expected value.
    XSDRTDO = 0x09,
    XSETSDRMASKS = 0x0A,
    XSDRINC = 0x0B,
    /// Begins a data register shift that is continued by XSDRC and finished by XSDRE.
    XSDRB = 0x0C,
    XSDRC = 0x0D,
    XSDRE = 0x0E,
    XSDRTDOB = 0x0F,
    XSDRTDOC = 0x10,
    XSDRTDOE = 0x11,
    /// Moves the TAP controller into a stable state.
    XSTATE = 0x12,
    /// State to enter after an instruction register shift.
    XENDIR = 0x13,
    /// State to enter after a data register shift.
    XENDDR = 0x14,
    XSIR2 = 0x15,
    XCOMMENT = 0x16,
    XWAIT = 0x17,
}

impl Opcode {
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        let opcode = match byte {
            0x00 => Opcode::XCOMPLETE,
            0x01 => Opcode::XTDOMASK,
            0x02 => Opcode::XSIR,
            0x03 => Opcode::XSDR,
            0x04 => Opcode::XRUNTEST,
            0x07 => Opcode::XREPEAT,
            0x08 => Opcode::XSDRSIZE,
            0x09 => Opcode::XSDRTDO,
            0x0A => Opcode::XSETSDRMASKS,
            0x0B => Opcode::XSDRINC,
            0x0C => Opcode::XSDRB,
            0x0D => Opcode::XSDRC,
            0x0E => Opcode::XSDRE,
            0x0F => Opcode::XSDRTDOB,
            0x10 => Opcode::XSDRTDOC,
            0x11 => Opcode::XSDRTDOE,
            0x12 => Opcode::XSTATE,
            0x13 => Opcode::XENDIR,
            0x14 => Opcode::XENDDR,
            0x15 => Opcode::XSIR2,
            0x16 => Opcode::XCOMMENT,
            0x17 => Opcode::XWAIT,
            _ => return None,
        };
        Some(opcode)
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Whether the converter knows how to translate this command.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Opcode::XCOMPLETE
                | Opcode::XTDOMASK
                | Opcode::XSDRTDO
                | Opcode::XREPEAT
                | Opcode::XRUNTEST
                | Opcode::XSIR
                | Opcode::XSDRSIZE
                | Opcode::XSDRB
                | Opcode::XSDRC
                | Opcode::XSDRE
                | Opcode::XSTATE
                | Opcode::XENDIR
                | Opcode::XENDDR
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::XCOMPLETE => "XCOMPLETE",
            Opcode::XTDOMASK => "XTDOMASK",
            Opcode::XSIR => "XSIR",
            Opcode::XSDR => "XSDR",
            Opcode::XRUNTEST => "XRUNTEST",
            Opcode::XREPEAT => "XREPEAT",
            Opcode::XSDRSIZE => "XSDRSIZE",
            Opcode::XSDRTDO => "XSDRTDO",
            Opcode::XSETSDRMASKS => "XSETSDRMASKS",
            Opcode::XSDRINC => "XSDRINC",
            Opcode::XSDRB => "XSDRB",
            Opcode::XSDRC => "XSDRC",
            Opcode::XSDRE => "XSDRE",
            Opcode::XSDRTDOB => "XSDRTDOB",
            Opcode::XSDRTDOC => "XSDRTDOC",
            Opcode::XSDRTDOE => "XSDRTDOE",
            Opcode::XSTATE => "XSTATE",
            Opcode::XENDIR => "XENDIR",
            Opcode::XENDDR => "XENDDR",
            Opcode::XSIR2 => "XSIR2",
            Opcode::XCOMMENT => "XCOMMENT",
            Opcode::XWAIT => "XWAIT",
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// IEEE 1149.1 TAP controller states with their XSVF encoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum TapState {
    TestLogicReset = 0x00,
    RunTestIdle = 0x01,
    SelectDrScan = 0x02,
    CaptureDr = 0x03,
    ShiftDr = 0x04,
    Exit1Dr = 0x05,
    PauseDr = 0x06,
    Exit2Dr = 0x07,
    UpdateDr = 0x08,
    SelectIrScan = 0x09,
    CaptureIr = 0x0A,
    ShiftIr = 0x0B,
    Exit1Ir = 0x0C,
    PauseIr = 0x0D,
    Exit2Ir = 0x0E,
    UpdateIr = 0x0F,
}

impl TapState {
    const ALL: [TapState; 16] = [
        TapState::TestLogicReset,
        TapState::RunTestIdle,
        TapState::SelectDrScan,
        TapState::CaptureDr,
        TapState::ShiftDr,
        TapState::Exit1Dr,
        TapState::PauseDr,
        TapState::Exit2Dr,
        TapState::UpdateDr,
        TapState::SelectIrScan,
        TapState::CaptureIr,
        TapState::ShiftIr,
        TapState::Exit1Ir,
        TapState::PauseIr,
        TapState::Exit2Ir,
        TapState::UpdateIr,
    ];

    pub fn from_byte(byte: u8) -> Option<TapState> {
        TapState::ALL.get(byte as usize).copied()
    }

    /// XSTATE may only target one of these on the player.
    pub fn is_stable_target(self) -> bool {
        matches!(self, TapState::TestLogicReset | TapState::RunTestIdle)
    }
}

/// XENDIR/XENDDR operand selecting Run-Test/Idle. The other value (1) selects the pause state.
pub const END_STATE_IDLE: u8 = 0x00;

#[test]
fn opcode_bytes_round_trip() {
    for byte in 0..=u8::MAX {
        if let Some(opcode) = Opcode::from_byte(byte) {
            assert_eq!(opcode.to_byte(), byte);
        }
    }
    assert_eq!(Opcode::from_byte(0x05), None);
    assert_eq!(Opcode::from_byte(0x18), None);
}

#[test]
fn supported_subset() {
    assert!(Opcode::XSDRTDO.is_supported());
    assert!(Opcode::XSDRE.is_supported());
    assert!(!Opcode::XSDR.is_supported());
    assert!(!Opcode::XSDRTDOB.is_supported());
    assert!(!Opcode::XWAIT.is_supported());
}

#[test]
fn stable_tap_states() {
    assert_eq!(TapState::from_byte(0x01), Some(TapState::RunTestIdle));
    assert_eq!(TapState::from_byte(0x0F), Some(TapState::UpdateIr));
    assert_eq!(TapState::from_byte(0x10), None);
    assert!(TapState::TestLogicReset.is_stable_target());
    assert!(!TapState::PauseDr.is_stable_target());
}

#[test]
fn bit_lengths() {
    assert_eq!(bits_to_bytes(0), 0);
    assert_eq!(bits_to_bytes(1), 1);
    assert_eq!(bits_to_bytes(8), 1);
    assert_eq!(bits_to_bytes(9), 2);
    assert_eq!(bits_to_bytes(400), 50);
}
