// Container probing for uploaded answer files
//
// Uploads bypass the capture pipeline, so their duration can only come
// from the file itself. Anything symphonia cannot read simply has no
// known duration.

use std::io::Cursor;
use std::sync::Arc;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;
use tracing::debug;

/// Duration of the default track in milliseconds, when the container says
pub fn probe_duration_ms(data: Arc<[u8]>, file_name: &str) -> Option<u64> {
    if data.is_empty() {
        return None;
    }

    let mut hint = Hint::new();
    if let Some((_, extension)) = file_name.rsplit_once('.') {
        hint.with_extension(extension);
    }

    let source = MediaSourceStream::new(
        Box::new(Cursor::new(data)),
        MediaSourceStreamOptions::default(),
    );

    let probed = match symphonia::default::get_probe().format(
        &hint,
        source,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed,
        Err(e) => {
            debug!("Could not probe upload {}: {}", file_name, e);
            return None;
        }
    };

    let track = probed.format.default_track()?;
    let params = &track.codec_params;
    let frames = params.n_frames?;

    frames_to_ms(frames, params.sample_rate, params.time_base)
}

/// Frame count to milliseconds; `None` when the header's numbers overflow
///
/// Frame counts come straight from the container header.
fn frames_to_ms(frames: u64, sample_rate: Option<u32>, time_base: Option<TimeBase>) -> Option<u64> {
    if let Some(sample_rate) = sample_rate.filter(|rate| *rate > 0) {
        return Some(frames.checked_mul(1000)? / sample_rate as u64);
    }

    let time = time_base?.calc_time(frames);
    time.seconds
        .checked_mul(1000)?
        .checked_add((time.frac * 1000.0) as u64)
}
