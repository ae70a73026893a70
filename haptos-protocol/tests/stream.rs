//! Stream-level properties of the queue + assembler pipeline.

use haptos_protocol::{assembler, ByteQueue, FrameAssembler, PanelEvent, RawFrame};
use proptest::prelude::*;

/// Valid frames with arbitrary field bytes, as raw byte vectors.
fn arb_frame() -> impl Strategy<Value = Vec<u8>> {
    let fixed = (
        prop::sample::select(vec![
            assembler::NOTIFY_TOUCH_BUTTON,
            assembler::NOTIFY_TOUCH_CHECKBOX,
            assembler::NOTIFY_TOUCH_SLIDER,
            assembler::NOTIFY_TOUCH_EDIT,
            assembler::NOTIFY_GET_PAGE,
            assembler::NOTIFY_GET_CHECKBOX,
            assembler::NOTIFY_GET_SLIDER,
        ]),
        prop::collection::vec(any::<u8>(), 5),
    )
        .prop_map(|(opcode, body)| {
            let mut frame = vec![opcode];
            frame.extend(body);
            frame
        });

    let edit = (
        prop::sample::select(vec![
            assembler::NOTIFY_GET_EDIT,
            assembler::NOTIFY_GET_TOUCH_EDIT,
        ]),
        prop::collection::vec(any::<u8>(), 4),
        prop::collection::vec(any::<u8>(), 0..=59),
    )
        .prop_map(|(opcode, body, params)| {
            let mut frame = vec![opcode];
            frame.extend(body);
            frame.push(params.len() as u8);
            frame.extend(params);
            frame
        });

    prop_oneof![3 => fixed, 1 => edit]
}

/// Bytes that can never start a frame.
fn arb_noise() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        any::<u8>().prop_filter("must not be a frame start", |b| {
            !assembler::is_frame_start(*b)
        }),
        0..8,
    )
}

fn reassemble_chunked(stream: &[u8], chunk: usize) -> Vec<RawFrame> {
    let mut queue = ByteQueue::new();
    let mut asm = FrameAssembler::new();
    let mut frames = Vec::new();

    for piece in stream.chunks(chunk.max(1)) {
        for &byte in piece {
            queue.push(byte);
        }
        while let Some(frame) = asm.poll(&mut queue) {
            frames.push(frame);
        }
    }
    frames
}

proptest! {
    #[test]
    fn queue_len_tracks_outstanding_bytes(bytes in prop::collection::vec(any::<u8>(), 0..255)) {
        let mut queue = ByteQueue::new();
        for (i, &byte) in bytes.iter().enumerate() {
            queue.push(byte);
            prop_assert_eq!(queue.len(), i + 1);
        }
        for i in (0..bytes.len()).rev() {
            prop_assert!(queue.pop().is_some());
            prop_assert_eq!(queue.len(), i);
        }
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn chunk_size_is_transparent(
        // Three 65-byte frames still fit the queue in the bulk case
        frames in prop::collection::vec(arb_frame(), 1..4),
        chunk in 1usize..16,
    ) {
        let stream: Vec<u8> = frames.iter().flatten().copied().collect();

        let bulk = reassemble_chunked(&stream, stream.len());
        let chunked = reassemble_chunked(&stream, chunk);

        prop_assert_eq!(&bulk, &chunked);
        prop_assert_eq!(bulk.len(), frames.len());
        for (recovered, original) in bulk.iter().zip(&frames) {
            prop_assert_eq!(recovered.as_bytes(), original.as_slice());
        }
    }

    #[test]
    fn frames_survive_interleaved_noise(
        frames in prop::collection::vec(arb_frame(), 1..5),
        noise in prop::collection::vec(arb_noise(), 5),
    ) {
        // noise | frame | noise | frame | ...
        let mut stream = Vec::new();
        for (frame, gap) in frames.iter().zip(&noise) {
            stream.extend(gap);
            stream.extend(frame);
        }

        let recovered = reassemble_chunked(&stream, 1);
        prop_assert_eq!(recovered.len(), frames.len());
        for (recovered, original) in recovered.iter().zip(&frames) {
            prop_assert_eq!(recovered.as_bytes(), original.as_slice());
        }
    }

    #[test]
    fn recovered_frames_decode(frames in prop::collection::vec(arb_frame(), 1..5)) {
        let stream: Vec<u8> = frames.iter().flatten().copied().collect();
        for frame in reassemble_chunked(&stream, 3) {
            // Vocabulary slots are arbitrary, so decode may reject a
            // frame, but it must never panic and never misreport length
            if let Ok(event) = PanelEvent::from_frame(&frame) {
                let _ = event.page_id();
            }
        }
    }
}
