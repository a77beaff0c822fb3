use serialhub_msgb::{FrameType, Request};

use crate::cmd::{emit_message, CmdArgs};
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_message, EncodedMessage, OutputFormat};

pub fn run(args: CmdArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(args.payload.as_deref())?;
    let rqst = Request::new(args.tc, args.tid, args.iid, args.cid).with_payload(&payload);

    let bytes = emit_message(args.out.as_deref(), |writer| {
        writer.write_cmd(args.seq, args.rqid, &rqst)
    })?;

    print_message(
        &EncodedMessage {
            frame_type: FrameType::DataSequenced,
            seq: args.seq,
            rqid: Some(args.rqid),
            bytes: &bytes,
        },
        format,
    );
    Ok(SUCCESS)
}

fn resolve_payload(input: Option<&str>) -> CliResult<Vec<u8>> {
    let Some(input) = input else {
        return Ok(Vec::new());
    };
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits.strip_prefix("0x").unwrap_or(digits.as_str());
    hex::decode(digits)
        .map_err(|err| CliError::new(USAGE, format!("--payload is not valid hex: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_when_absent() {
        assert!(resolve_payload(None).unwrap().is_empty());
    }

    #[test]
    fn accepts_spaced_and_prefixed_hex() {
        assert_eq!(resolve_payload(Some("de ad")).unwrap(), vec![0xde, 0xad]);
        assert_eq!(resolve_payload(Some("0xBEEF")).unwrap(), vec![0xbe, 0xef]);
    }

    #[test]
    fn invalid_hex_is_usage_error() {
        let err = resolve_payload(Some("abc")).unwrap_err();
        assert_eq!(err.code, USAGE);

        let err = resolve_payload(Some("zz")).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
