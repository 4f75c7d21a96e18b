/*!
    file transfer handshake over a blocking byte link

    the protocol is unidirectional per call and only the receiving side acknowledges, to signal its buffer is ready before the payload starts:

    - sending: `FTX`, name, `0`, size (4 bytes little endian), payload
    - receiving: `FRX`, name, `0`, then size is received, `ACK` is sent, then payload is received

    there is no checksum nor retry, corruption on the wire is not detected at this layer
*/

use embedded_io::{Read, Write, ReadExactError, ErrorKind};
use thiserror::Error;
use log::*;

use crate::command::{Command, MAX_NAME};
#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};


/// error regarding a file transfer
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("problem with the byte link: {0:?}")]
    Link(ErrorKind),
    #[error("link closed in the middle of a transfer")]
    Eof,
    #[error("file name is too long or contains a null byte")]
    Name,
    #[error("file is too large for a 32 bit size")]
    Size,
    #[error("incoming file of {0} bytes does not fit the receive buffer")]
    Overflow(u32),
    #[error("no data arrived in expected time")]
    Timeout,
}

/// file name as sent on the wire, without its null terminator
pub type FileName = heapless::String<MAX_NAME>;

/// check a name can be sent as a null-terminated file name
pub fn file_name(name: &str) -> Result<FileName, Error> {
    if name.bytes().any(|b| b == 0)
        {return Err(Error::Name)}
    FileName::try_from(name).map_err(|_| Error::Name)
}


/// send a file, returns once every byte has been handed to the link
pub fn send_file<L: Write>(link: &mut L, name: &str, data: &[u8]) -> Result<(), Error> {
    let size = u32::try_from(data.len()).map_err(|_| Error::Size)?;
    let name = file_name(name)?;
    debug!("sending file {:?} of {} bytes", name, size);
    request(link, Command::Ftx, &name)?;
    link.write_all(&size.to_le_bytes()).map_err(link_error)?;
    link.write_all(data).map_err(link_error)?;
    Ok(())
}

/**
    request a file and receive it in the given buffer, returning its size

    the incoming size is checked against the buffer before acknowledging, a file that does not fit is refused with [Error::Overflow] and no `ACK` is sent
*/
pub fn receive_file_into<L: Read + Write>(link: &mut L, name: &str, buffer: &mut [u8]) -> Result<u32, Error> {
    let size = receive_size(link, name)?;
    let len = usize::try_from(size).map_err(|_| Error::Overflow(size))?;
    if len > buffer.len() {
        warn!("refusing file of {} bytes in a buffer of {}", size, buffer.len());
        return Err(Error::Overflow(size));
    }
    link.write_all(&[Command::Ack.byte()]).map_err(link_error)?;
    no_eof(link.read_exact(&mut buffer[.. len]))?;
    debug!("received file of {} bytes", size);
    Ok(size)
}

/// request a file and receive it in a buffer allocated for its announced size
#[cfg(feature = "alloc")]
pub fn receive_file<L: Read + Write>(link: &mut L, name: &str) -> Result<Vec<u8>, Error> {
    let size = receive_size(link, name)?;
    let mut buffer = vec![0; usize::try_from(size).map_err(|_| Error::Size)?];
    link.write_all(&[Command::Ack.byte()]).map_err(link_error)?;
    no_eof(link.read_exact(&mut buffer))?;
    debug!("received file of {} bytes", size);
    Ok(buffer)
}

/// send the file receive request and get back the announced size
fn receive_size<L: Read + Write>(link: &mut L, name: &str) -> Result<u32, Error> {
    let name = file_name(name)?;
    debug!("requesting file {:?}", name);
    request(link, Command::Frx, &name)?;
    let mut size = [0; 4];
    no_eof(link.read_exact(&mut size))?;
    Ok(u32::from_le_bytes(size))
}

/// send a command followed by a null-terminated name
fn request<L: Write>(link: &mut L, command: Command, name: &str) -> Result<(), Error> {
    link.write_all(&[command.byte()]).map_err(link_error)?;
    link.write_all(name.as_bytes()).map_err(link_error)?;
    link.write_all(&[0]).map_err(link_error)?;
    Ok(())
}

fn link_error<E: embedded_io::Error>(error: E) -> Error {
    Error::Link(error.kind())
}
/// end of file only happens on links that can close, which then interrupts the transfer
fn no_eof<E: embedded_io::Error>(result: Result<(), ReadExactError<E>>) -> Result<(), Error> {
    result.map_err(|e| match e {
        ReadExactError::UnexpectedEof => Error::Eof,
        ReadExactError::Other(io) => link_error(io),
        })
}
