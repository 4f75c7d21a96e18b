/*!
    host console, the other end of the target's uart

    it prints the text sent by the target and serves its requests:

    - `ENQ` opens the connection, answered once with `ACK`
    - `FTX` the target sends a file, stored in the console's directory
    - `FRX` the target requests a file, read from the console's directory
    - `EOT` closes the connection and ends [Console::run]
*/

use std::{
    io::Write,
    path::{Path, PathBuf, Component},
    string::String,
    vec::Vec,
    };
use tokio::io::{AsyncRead, AsyncWrite, AsyncReadExt, AsyncWriteExt};
use thiserror::Error;
use log::*;

use crate::command::{Command, MAX_NAME};


/// prefix of the console's messages
pub const PROGNAME: &str = "IOb-Console";

/// error regarding the console session
#[derive(Error, Debug)]
pub enum Error {
    #[error("problem with serial link")]
    Bus(std::io::Error),
    #[error("problem accessing file {0:?}")]
    File(PathBuf, #[source] std::io::Error),
    #[error("target requested an invalid file name {0:?}")]
    Name(String),
    #[error("file is too large for a 32 bit size")]
    Size,
}
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Bus(error)
    }
}


/// console session on a byte link
pub struct Console<L, O = std::io::Stdout> {
    /// uart RX/TX stream
    link: L,
    /// where target text is printed
    output: O,
    /// where transferred files are read and written
    directory: PathBuf,
    connected: bool,
}
impl<L: AsyncRead + AsyncWrite + Unpin> Console<L> {
    /// console printing to stdout, with files in the given directory
    pub fn new(link: L, directory: impl Into<PathBuf>) -> Self {
        Self::with_output(link, directory, std::io::stdout())
    }
}
impl<L: AsyncRead + AsyncWrite + Unpin, O: Write> Console<L, O> {
    pub fn with_output(link: L, directory: impl Into<PathBuf>, output: O) -> Self {
        Self {
            link,
            output,
            directory: directory.into(),
            connected: false,
        }
    }
    /// whether the target opened the connection
    pub fn connected(&self) -> bool {self.connected}
    pub fn output(&self) -> &O {&self.output}
    pub fn directory(&self) -> &Path {&self.directory}

    /// process the target's bytes until it closes the connection
    pub async fn run(&mut self) -> Result<(), Error> {
        loop {
            let byte = self.link.read_u8().await?;
            match Command::decode(byte) {
                Command::Enq => {
                    if ! self.connected {
                        self.connected = true;
                        self.link.write_all(&[Command::Ack.byte()]).await?;
                        self.link.flush().await?;
                        info!("{}: connected", PROGNAME);
                    }
                },
                Command::Eot => {
                    info!("{}: exiting", PROGNAME);
                    self.output.flush()?;
                    return Ok(());
                },
                Command::Ftx => {
                    info!("{}: got file receive request", PROGNAME);
                    self.receive_file().await?;
                },
                Command::Frx => {
                    info!("{}: got file send request", PROGNAME);
                    self.send_file().await?;
                },
                _ => {
                    // text is latin-1
                    let mut encoded = [0; 4];
                    self.output.write_all(char::from(byte).encode_utf8(&mut encoded).as_bytes())?;
                    self.output.flush()?;
                },
            }
        }
    }

    /// store a file sent by the target
    async fn receive_file(&mut self) -> Result<(), Error> {
        let path = self.receive_path().await?;
        let size = self.link.read_u32_le().await?;
        info!("{}: file size: {} bytes", PROGNAME, size);
        let mut file = tokio::fs::File::create(&path).await
            .map_err(|error| Error::File(path.clone(), error))?;
        // payload goes straight to the file, the announced size is not trusted for allocation
        let copied = tokio::io::copy(&mut (&mut self.link).take(u64::from(size)), &mut file).await?;
        file.flush().await
            .map_err(|error| Error::File(path.clone(), error))?;
        if copied < u64::from(size) {
            warn!("{}: link closed after {} of {} bytes", PROGNAME, copied, size);
            return Err(Error::Bus(std::io::ErrorKind::UnexpectedEof.into()));
        }
        info!("{}: file received", PROGNAME);
        Ok(())
    }
    /// serve a file requested by the target
    async fn send_file(&mut self) -> Result<(), Error> {
        let path = self.receive_path().await?;
        let data = tokio::fs::read(&path).await
            .map_err(|error| Error::File(path.clone(), error))?;
        let size = u32::try_from(data.len()).map_err(|_| Error::Size)?;
        info!("{}: file of size {} bytes", PROGNAME, size);
        self.link.write_all(&size.to_le_bytes()).await?;
        self.link.flush().await?;
        // the target acknowledges once its buffer is ready
        while self.link.read_u8().await? != Command::Ack.byte() {}
        self.link.write_all(&data).await?;
        self.link.flush().await?;
        info!("{}: file sent", PROGNAME);
        Ok(())
    }

    /// receive a null-terminated file name and resolve it in the console's directory
    async fn receive_path(&mut self) -> Result<PathBuf, Error> {
        let mut name = Vec::new();
        loop {
            let byte = self.link.read_u8().await?;
            if byte == 0
                {break}
            if name.len() == MAX_NAME {
                let name = String::from_utf8_lossy(&name).into_owned();
                warn!("{}: file name {:?}... exceeds {} bytes", PROGNAME, name, MAX_NAME);
                return Err(Error::Name(name));
            }
            name.push(byte);
        }
        let name = String::from_utf8(name)
            .map_err(|error| Error::Name(String::from_utf8_lossy(error.as_bytes()).into_owned()))?;
        if name.is_empty()
            || ! Path::new(&name).components().all(|c| matches!(c, Component::Normal(_)))
        {
            warn!("{}: refusing file name {:?}", PROGNAME, name);
            return Err(Error::Name(name));
        }
        Ok(self.directory.join(name))
    }
}
