//! host console for targets running the iob uart driver

use std::path::PathBuf;
use clap::Parser;
use serial2_tokio::{SerialPort, CharSize, StopBits, Parity};
use log::*;

use iobperiph::console::Console;


#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// serial port the target is connected to
    #[arg(short = 's', long)]
    port: PathBuf,
    /// baudrate programmed in the target's uart
    #[arg(short, long, default_value_t = 115_200)]
    baudrate: u32,
    /// directory where transferred files are read and written
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let port = match SerialPort::open(&args.port, |mut settings: serial2_tokio::Settings| {
            settings.set_raw();
            settings.set_baud_rate(args.baudrate)?;
            settings.set_char_size(CharSize::Bits8);
            settings.set_stop_bits(StopBits::One);
            settings.set_parity(Parity::None);
            Ok(settings)
            }) {
        Ok(port) => port,
        Err(error) => {
            error!("cannot open {:?}: {}", args.port, error);
            std::process::exit(1);
        },
    };
    info!("listening on {:?} at {} bauds", args.port, args.baudrate);

    let mut console = Console::new(port, args.directory);
    if let Err(error) = console.run().await {
        error!("console stopped: {}", error);
        std::process::exit(1);
    }
}
