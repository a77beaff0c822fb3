use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serialhub_msgb::{MessageWriter, MsgbError};
use tracing::debug;

use crate::exit::{io_error, msgb_error, CliResult};
use crate::output::OutputFormat;

pub mod ack;
pub mod command;
pub mod nak;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode an ACK message.
    Ack(AckArgs),
    /// Encode a NAK message.
    Nak(NakArgs),
    /// Encode a sequenced command message.
    Cmd(CmdArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ack(args) => ack::run(args, format),
        Command::Nak(args) => nak::run(args, format),
        Command::Cmd(args) => command::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct AckArgs {
    /// Sequence id of the frame being acknowledged.
    #[arg(long, short = 's', default_value = "0", value_parser = parse_u8)]
    pub seq: u8,
    /// Also write the message to this device or file.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NakArgs {
    /// Also write the message to this device or file.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CmdArgs {
    /// Frame sequence id.
    #[arg(long, short = 's', default_value = "0", value_parser = parse_u8)]
    pub seq: u8,
    /// Request id.
    #[arg(long, default_value = "1", value_parser = parse_u16)]
    pub rqid: u16,
    /// Target category.
    #[arg(long, value_parser = parse_u8)]
    pub tc: u8,
    /// Target id.
    #[arg(long, default_value = "1", value_parser = parse_u8)]
    pub tid: u8,
    /// Instance id.
    #[arg(long, default_value = "0", value_parser = parse_u8)]
    pub iid: u8,
    /// Command id.
    #[arg(long, value_parser = parse_u8)]
    pub cid: u8,
    /// Application payload as hex (e.g. "dead" or "de ad").
    #[arg(long, value_name = "HEX")]
    pub payload: Option<String>,
    /// Also write the message to this device or file.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Encode one message through a [`MessageWriter`], writing it to `out` when
/// given. Returns the encoded bytes, which are exactly the bytes written.
pub(crate) fn emit_message<F>(out: Option<&Path>, encode: F) -> CliResult<Vec<u8>>
where
    F: FnOnce(&mut MessageWriter<Box<dyn Write>>) -> Result<usize, MsgbError>,
{
    let (sink, context) = match out {
        Some(path) => (Box::new(open_out(path)?) as Box<dyn Write>, "write failed"),
        None => (Box::new(io::sink()) as Box<dyn Write>, "encode failed"),
    };

    let mut writer = MessageWriter::new(sink);
    let written = encode(&mut writer).map_err(|err| msgb_error(context, err))?;
    if let Some(path) = out {
        debug!(path = %path.display(), written, "message written");
    }
    Ok(writer.last_message().to_vec())
}

// Devices ignore truncation; regular files must hold only the new message.
fn open_out(path: &Path) -> CliResult<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))
}

fn parse_u8(input: &str) -> Result<u8, String> {
    let value = parse_uint(input)?;
    u8::try_from(value).map_err(|_| format!("{input} does not fit in 8 bits"))
}

fn parse_u16(input: &str) -> Result<u16, String> {
    let value = parse_uint(input)?;
    u16::try_from(value).map_err(|_| format!("{input} does not fit in 16 bits"))
}

fn parse_uint(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid integer: {input}"))
}

#[cfg(test)]
mod tests {
    use serialhub_msgb::layout::offset;
    use serialhub_msgb::{
        command_message_len, FrameType, Request, COMMAND_MAX_PAYLOAD, CONTROL_MESSAGE_LEN,
    };

    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_u8("7"), Ok(7));
        assert_eq!(parse_u8("0x80"), Ok(0x80));
        assert_eq!(parse_u16("0XBEEF"), Ok(0xbeef));
    }

    #[test]
    fn rejects_overflow_and_garbage() {
        assert!(parse_u8("0x100").is_err());
        assert!(parse_u16("70000").is_err());
        assert!(parse_u8("seven").is_err());
        assert!(parse_u8("").is_err());
    }

    fn temp_path(tag: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "serialhub-emit-{tag}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("link.bin");
        (dir, path)
    }

    #[test]
    fn emit_message_writes_message_to_file() {
        let (dir, path) = temp_path("file");

        let bytes = emit_message(Some(&path), |writer| writer.write_ack(3)).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, bytes);
        assert_eq!(written.len(), CONTROL_MESSAGE_LEN);
        assert_eq!(written[offset::FRAME_SEQ], 3);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn emit_message_replaces_longer_file_contents() {
        let (dir, path) = temp_path("truncate");
        let payload = [0x42u8; 8];
        let rqst = Request::new(0x01, 0x01, 0x00, 0x01).with_payload(&payload);

        emit_message(Some(&path), |writer| writer.write_cmd(1, 1, &rqst)).unwrap();
        assert_eq!(
            std::fs::read(&path).unwrap().len(),
            command_message_len(payload.len())
        );

        let ack = emit_message(Some(&path), |writer| writer.write_ack(3)).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), CONTROL_MESSAGE_LEN);
        assert_eq!(written, ack);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn emit_message_without_out_still_encodes() {
        let bytes = emit_message(None, |writer| writer.write_nak()).unwrap();

        assert_eq!(bytes.len(), CONTROL_MESSAGE_LEN);
        assert_eq!(bytes[offset::FRAME_TYPE], FrameType::Nak.as_u8());
    }

    #[test]
    fn emit_message_maps_encode_errors() {
        let payload = vec![0u8; COMMAND_MAX_PAYLOAD + 1];
        let rqst = Request::new(0x01, 0x01, 0x00, 0x01).with_payload(&payload);

        let err = emit_message(None, |writer| writer.write_cmd(0, 0, &rqst)).unwrap_err();

        assert_eq!(err.code, crate::exit::DATA_INVALID);
        assert!(err.message.starts_with("encode failed"));
    }
}
