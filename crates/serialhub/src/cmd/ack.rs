use serialhub_msgb::FrameType;

use crate::cmd::{emit_message, AckArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_message, EncodedMessage, OutputFormat};

pub fn run(args: AckArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = emit_message(args.out.as_deref(), |writer| writer.write_ack(args.seq))?;

    print_message(
        &EncodedMessage {
            frame_type: FrameType::Ack,
            seq: args.seq,
            rqid: None,
            bytes: &bytes,
        },
        format,
    );
    Ok(SUCCESS)
}
