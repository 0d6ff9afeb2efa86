//! APDU command framing
//!
//! Command APDUs according to ISO/IEC 7816-4. The olstap exchange uses a
//! single instruction, SELECT by AID; anything else a responder receives is
//! answered with `6D 00`.

use bytes::{BufMut, Bytes, BytesMut};

use crate::Error;

/// SELECT instruction (INS)
pub const INS_SELECT: u8 = 0xA4;
/// SELECT parameter P1: select by DF name (AID)
pub const P1_SELECT_BY_NAME: u8 = 0x04;
/// SELECT parameter P2: first or only occurrence
pub const P2_FIRST_OR_ONLY: u8 = 0x00;

/// Returns true iff the frame is a SELECT-by-AID command.
///
/// A frame shorter than the 4-byte header is "not a SELECT command", never
/// an error. Only INS/P1/P2 are inspected; the class byte is not.
pub fn is_select_aid(frame: &[u8]) -> bool {
    if frame.len() < 4 {
        return false;
    }
    frame[1] == INS_SELECT && frame[2] == P1_SELECT_BY_NAME && frame[3] == P2_FIRST_OR_ONLY
}

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
        }
    }

    /// Build a SELECT-by-AID command (`00 A4 04 00 Lc AID`).
    ///
    /// Precondition: `aid.len() <= 255` (single-byte Lc field). Longer AIDs
    /// are a caller error; real AIDs are at most 16 bytes.
    pub fn select_aid<T: Into<Bytes>>(aid: T) -> Self {
        let aid = aid.into();
        debug_assert!(aid.len() <= 255, "AID does not fit a single-byte Lc");
        Self::new_with_data(0x00, INS_SELECT, P1_SELECT_BY_NAME, P2_FIRST_OR_ONLY, aid)
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Serialize to raw APDU bytes: `[CLA, INS, P1, P2]` followed by
    /// `Lc ++ data` when a payload is present.
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(4 + self.data.as_ref().map_or(0, |d| 1 + d.len()));

        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if let Some(data) = &self.data {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        buffer.freeze()
    }

    /// Parse a command from raw bytes.
    ///
    /// Accepts a bare 4-byte header or header plus `Lc ++ data`; an Lc that
    /// disagrees with the remaining frame length is rejected.
    pub fn from_bytes(frame: &[u8]) -> Result<Self, Error> {
        if frame.len() < 4 {
            return Err(Error::InvalidCommandLength(frame.len()));
        }

        let mut command = Self::new(frame[0], frame[1], frame[2], frame[3]);

        if frame.len() > 4 {
            let lc = frame[4] as usize;
            if frame.len() != 5 + lc {
                return Err(Error::InvalidCommandLength(frame.len()));
            }
            if lc > 0 {
                command.data = Some(Bytes::copy_from_slice(&frame[5..5 + lc]));
            }
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_aid_serialization() {
        let aid = Bytes::from_static(&[0xF0, 0x00, 0x15, 0x08, 0x05, 0x05, 0x08]);
        let cmd = Command::select_aid(aid);
        let bytes = cmd.to_bytes();

        assert_eq!(bytes[0], 0x00); // CLA
        assert_eq!(bytes[1], 0xA4); // INS
        assert_eq!(bytes[2], 0x04); // P1
        assert_eq!(bytes[3], 0x00); // P2
        assert_eq!(bytes[4], 0x07); // Lc
        assert_eq!(&bytes[5..], &[0xF0, 0x00, 0x15, 0x08, 0x05, 0x05, 0x08]);
    }

    #[test]
    fn select_aid_empty_aid() {
        // Degenerate but legal: Lc = 0 with no data bytes following
        let cmd = Command::select_aid(Bytes::new());
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xA4, 0x04, 0x00, 0x00]);
    }

    #[test]
    fn header_only_serialization() {
        let cmd = Command::new(0x00, 0xB0, 0x00, 0x00);
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xB0, 0x00, 0x00]);
    }

    #[test]
    fn is_select_aid_matching() {
        assert!(is_select_aid(&[0x00, 0xA4, 0x04, 0x00]));
        assert!(is_select_aid(&[0x00, 0xA4, 0x04, 0x00, 0x02, 0xF0, 0x00]));
        // Class byte is not inspected
        assert!(is_select_aid(&[0x80, 0xA4, 0x04, 0x00]));
    }

    #[test]
    fn is_select_aid_rejects_other_instructions() {
        assert!(!is_select_aid(&[0x00, 0xB0, 0x00, 0x00]));
        assert!(!is_select_aid(&[0x00, 0xA4, 0x00, 0x00])); // wrong P1
        assert!(!is_select_aid(&[0x00, 0xA4, 0x04, 0x0C])); // wrong P2
    }

    #[test]
    fn is_select_aid_short_frames() {
        assert!(!is_select_aid(&[]));
        assert!(!is_select_aid(&[0x00]));
        assert!(!is_select_aid(&[0x00, 0xA4]));
        assert!(!is_select_aid(&[0x00, 0xA4, 0x04]));
    }

    #[test]
    fn from_bytes_round_trip() {
        let cmd = Command::select_aid(Bytes::from_static(&[0xA0, 0x00, 0x00]));
        let parsed = Command::from_bytes(&cmd.to_bytes()).unwrap();
        assert_eq!(parsed, cmd);

        let header_only = Command::new(0x00, 0xB0, 0x00, 0x00);
        let parsed = Command::from_bytes(&header_only.to_bytes()).unwrap();
        assert_eq!(parsed, header_only);
    }

    #[test]
    fn from_bytes_rejects_bad_lengths() {
        assert_eq!(
            Command::from_bytes(&[0x00, 0xA4]),
            Err(Error::InvalidCommandLength(2))
        );
        // Lc says 3 bytes of data, only 1 present
        assert_eq!(
            Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0xF0]),
            Err(Error::InvalidCommandLength(6))
        );
    }
}
