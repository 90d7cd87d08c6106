//! Loopback over a noisy in-memory link
//!
//! A producer thread decodes a byte stream containing noise, a corrupted
//! frame and a few valid frames; the main thread takes frames through a
//! `PacketReceiver`.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use fclink::protocol::ForceCommand;
use fclink::{DecoderConfig, Delivery, Frame, PacketType, StreamDecoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("fclink loopback");
    println!("===============\n");

    let mut link = vec![0x00, 0x13, 0x55, 0x21];
    link.extend_from_slice(&Frame::with_payload(PacketType::Heartbeat.as_u8(), &[])?.wire_bytes()?);

    let mut corrupted = Frame::with_payload(PacketType::ProgrammableTx.as_u8(), &[0x01])?
        .wire_bytes()?
        .to_vec();
    corrupted[4] ^= 0x08;
    link.extend_from_slice(&corrupted);

    link.extend_from_slice(
        &Frame::with_payload(PacketType::VersionResponse.as_u8(), b"FC-1.4.2")?.wire_bytes()?,
    );
    link.extend_from_slice(
        &Frame::with_payload(
            PacketType::ForceCommand.as_u8(),
            &[ForceCommand::Land.as_u8()],
        )?
        .wire_bytes()?,
    );
    println!("Link carries {} bytes", link.len());

    let mut decoder = StreamDecoder::with_config(DecoderConfig {
        delivery: Delivery::Queue { depth: 8 },
        ..DecoderConfig::default()
    });
    let receiver = decoder.receiver();

    let producer = thread::spawn(move || -> fclink::Result<()> {
        let mut serial = Cursor::new(link);
        let mut scratch = [0u8; 3];
        while decoder.feed_from(&mut serial, &mut scratch)? > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    });

    let mut taken = 0;
    while taken < 3 {
        match receiver.try_take_packet() {
            Some(frame) => {
                taken += 1;
                let kind = frame
                    .packet_type()
                    .map_or_else(|| format!("{:#04x}", frame.frame_type()), |t| t.to_string());
                println!(
                    "Received {kind}: length={}, payload={:02x?}",
                    frame.length(),
                    frame.payload()
                );
            }
            None if producer.is_finished() && !receiver.has_pending() => break,
            None => thread::sleep(Duration::from_millis(1)),
        }
    }

    producer.join().map_err(|_| "producer panicked")??;

    let stats = receiver.stats();
    println!(
        "\nDecoded {} frames, rejected {}, discarded {} noise bytes",
        stats.frames_decoded,
        stats.rejected_frames(),
        stats.noise_bytes
    );

    Ok(())
}
