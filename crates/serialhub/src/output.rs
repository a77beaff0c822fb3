use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serialhub_msgb::layout::offset;
use serialhub_msgb::FrameType;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A message as produced by one encoder call.
pub struct EncodedMessage<'a> {
    pub frame_type: FrameType,
    pub seq: u8,
    pub rqid: Option<u16>,
    pub bytes: &'a [u8],
}

impl EncodedMessage<'_> {
    fn frame_len(&self) -> u16 {
        u16::from_le_bytes([
            self.bytes[offset::FRAME_LEN],
            self.bytes[offset::FRAME_LEN + 1],
        ])
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    schema_id: &'a str,
    frame_type: &'a str,
    frame_type_tag: u8,
    seq: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    rqid: Option<u16>,
    frame_len: u16,
    size: usize,
    hex: String,
}

impl<'a> From<&'a EncodedMessage<'a>> for MessageOutput<'a> {
    fn from(msg: &'a EncodedMessage<'a>) -> Self {
        Self {
            schema_id: "https://schemas.3leaps.dev/serialhub/cli/v1/message-encoded.schema.json",
            frame_type: msg.frame_type.name(),
            frame_type_tag: msg.frame_type.as_u8(),
            seq: msg.seq,
            rqid: msg.rqid,
            frame_len: msg.frame_len(),
            size: msg.bytes.len(),
            hex: hex::encode(msg.bytes),
        }
    }
}

pub fn print_message(msg: &EncodedMessage<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput::from(msg);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "SEQ", "RQID", "SIZE", "BYTES"])
                .add_row(vec![
                    msg.frame_type.name().to_string(),
                    msg.seq.to_string(),
                    msg.rqid.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    msg.bytes.len().to_string(),
                    hex_dump(msg.bytes),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} seq={} size={} bytes={}",
                msg.frame_type.name(),
                msg.seq,
                msg.bytes.len(),
                hex_dump(msg.bytes)
            );
        }
        OutputFormat::Raw => {
            print_raw(msg.bytes);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Space-separated lowercase hex, e.g. `aa 55 40`.
fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
