/*!
    command bytes framing the uart console protocol

    any byte that is not a command is plain text to be printed by the console
*/

use bilge::prelude::*;


/// maximum length of a transferred file name, terminating null byte excluded
pub const MAX_NAME: usize = 64;

/// start text, signal start of a data sequence to be printed
pub const STX: u8 = 0x02;
/// end text, signal end of a data sequence to be printed
pub const ETX: u8 = 0x03;
/// end of transmission, closes the uart connection
pub const EOT: u8 = 0x04;
/// enquiry, opens the uart connection
pub const ENQ: u8 = 0x05;
/// acknowledge reception of a message
pub const ACK: u8 = 0x06;
/// file transmit request, the target is sending a file
pub const FTX: u8 = 0x07;
/// file receive request, the target wants to receive a file
pub const FRX: u8 = 0x08;

/// decoded command byte
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, Debug, PartialEq)]
pub enum Command {
    /// not a command, the byte is text
    #[fallback]
    Text = 0,

    Stx = 0x02,
    Etx = 0x03,
    Eot = 0x04,
    Enq = 0x05,
    Ack = 0x06,
    Ftx = 0x07,
    Frx = 0x08,
}
impl Command {
    /// decode a byte received on the link
    pub fn decode(byte: u8) -> Self {
        Self::from(byte)
    }
    /**
        byte to put on the link

        only protocol commands are meant to be encoded, [Command::Text] stands for any non-command byte and encodes to `0`, which the link would read as a string terminator
    */
    pub fn byte(self) -> u8 {
        debug_assert!(self != Command::Text, "text is not a command byte");
        u8::from(self)
    }
}
