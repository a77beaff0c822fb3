use serialhub_msgb::FrameType;

use crate::cmd::{emit_message, NakArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_message, EncodedMessage, OutputFormat};

pub fn run(args: NakArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = emit_message(args.out.as_deref(), |writer| writer.write_nak())?;

    print_message(
        &EncodedMessage {
            frame_type: FrameType::Nak,
            seq: 0,
            rqid: None,
            bytes: &bytes,
        },
        format,
    );
    Ok(SUCCESS)
}
