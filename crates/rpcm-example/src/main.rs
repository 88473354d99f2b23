//! Negotiates a stereo 16-bit stream on the default PCM device and plays
//! two seconds of a sine tone through it.

use std::f32::consts::TAU;

use rpcm_core::{Access, Format, Param};
use rpcm_device::Negotiation;
use rpcm_linux::{Direction, Pcm};

const RATE: u32 = 44100;
const CHANNELS: u32 = 2;
const FRAME_BYTES: usize = 4; // s16le * 2 channels
const TONE_HZ: f32 = 440.0;
const SECONDS: u64 = 2;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = run() {
        tracing::error!(?error, "playback failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut pcm = Pcm::open(0, 0, Direction::Playback)?;

    let mut nego = Negotiation::new();
    nego.fill();
    nego.set(Param::Access, Access::RwInterleaved.into())?;
    nego.set(Param::Format, Format::S16Le.into())?;
    nego.set(Param::Channels, CHANNELS)?;
    nego.set(Param::Rate, RATE)?;
    nego.commit(&mut pcm)?;

    let rate = nego.get(Param::Rate, 0)?;
    let period = nego.get(Param::PeriodSize, 0)?;
    tracing::info!(rate, period, "negotiated configuration");

    let mut sw = nego.software()?;
    nego.commit_software(&mut pcm, &mut sw)?;

    let total = u64::from(rate) * SECONDS;
    let mut buf = Vec::with_capacity(period as usize * FRAME_BYTES);
    let mut written = 0u64;

    while written < total {
        let chunk = u64::from(period).min(total - written);
        buf.clear();
        for i in 0..chunk {
            let t = (written + i) as f32 / rate as f32;
            let sample = ((TAU * TONE_HZ * t).sin() * 0.3 * f32::from(i16::MAX)) as i16;
            for _ in 0..CHANNELS {
                buf.extend_from_slice(&sample.to_le_bytes());
            }
        }

        let mut sent = 0u64;
        while sent < chunk {
            let taken = pcm.writei(&buf[sent as usize * FRAME_BYTES..], chunk - sent)?;
            if taken == 0 {
                break;
            }
            sent += taken;
        }
        written += chunk;
    }

    pcm.drain()?;
    Ok(())
}
