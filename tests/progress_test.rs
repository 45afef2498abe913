//! Tests for the transfer progress renderer

use std::time::{Duration, Instant};

use git2_cli::domain::{Phase, ProgressRenderer, TransferStats};

fn receiving(received: u32, total: u32, bytes: u64) -> TransferStats {
    TransferStats {
        received_objects: received,
        total_objects: total,
        received_bytes: bytes,
        ..TransferStats::default()
    }
}

fn resolving(indexed: u32, total: u32) -> TransferStats {
    TransferStats {
        received_objects: 10,
        total_objects: 10,
        indexed_deltas: indexed,
        total_deltas: total,
        ..TransferStats::default()
    }
}

fn output(renderer: ProgressRenderer<Vec<u8>>) -> String {
    String::from_utf8(renderer.into_inner()).unwrap()
}

// ============================================================
// sideband
// ============================================================

#[test]
fn given_shorter_redraw_when_rendered_then_padded_to_cover_previous() {
    // Arrange
    let mut renderer = ProgressRenderer::new(Vec::new());

    // Act
    renderer.on_sideband_message(b"Counting: 12345678\r").unwrap();
    renderer.on_sideband_message(b"Done: 12\r").unwrap();

    // Assert
    let text = output(renderer);
    let second = text.split('\r').nth(1).unwrap();
    assert_eq!(second.len(), "remote: Counting: 12345678".len());
    assert!(second.starts_with("remote: Done: 12"));
    assert!(second.ends_with("          "));
}

#[test]
fn given_twenty_then_twelve_columns_when_rendered_then_eight_spaces_pad() {
    let mut renderer = ProgressRenderer::new(Vec::new());

    renderer.on_sideband_message(b"abcdefghijkl\r").unwrap();
    assert_eq!(renderer.state().last_rendered_length, 20);
    renderer.on_sideband_message(b"wxyz\r").unwrap();

    assert_eq!(renderer.state().last_rendered_length, 12);
    assert!(output(renderer).ends_with("remote: wxyz        \r"));
}

#[test]
fn given_multiple_lines_in_one_message_when_rendered_then_each_prefixed() {
    let mut renderer = ProgressRenderer::new(Vec::new());

    renderer
        .on_sideband_message(b"Enumerating objects: 5, done.\nCounting objects: 20% (1/5)\r")
        .unwrap();

    assert_eq!(
        output(renderer),
        "remote: Enumerating objects: 5, done.\nremote: Counting objects: 20% (1/5)\r"
    );
}

#[test]
fn given_newline_terminated_line_when_next_line_shorter_then_no_padding() {
    let mut renderer = ProgressRenderer::new(Vec::new());

    renderer.on_sideband_message(b"a long line of text\n").unwrap();
    renderer.on_sideband_message(b"short\n").unwrap();

    assert_eq!(
        output(renderer),
        "remote: a long line of text\nremote: short\n"
    );
}

#[test]
fn given_unterminated_text_when_rendered_then_buffered() {
    let mut renderer = ProgressRenderer::new(Vec::new());

    renderer.on_sideband_message(b"partial").unwrap();

    assert_eq!(renderer.state().current_line, b"remote: partial".to_vec());
    assert_eq!(output(renderer), "");
}

// ============================================================
// transfer phases
// ============================================================

#[test]
fn given_receiving_stats_when_rendered_then_reports_percent_size_and_rate() {
    // Arrange
    let mut renderer = ProgressRenderer::new(Vec::new());
    let start = Instant::now();

    // Act
    renderer
        .on_transfer_progress_at(&receiving(0, 4, 0), start)
        .unwrap();
    renderer
        .on_transfer_progress_at(&receiving(1, 4, 2048), start + Duration::from_secs(2))
        .unwrap();

    // Assert
    assert_eq!(renderer.state().phase, Phase::Receiving);
    let text = output(renderer);
    assert!(text.starts_with("Receiving objects:   0% (0/4), 0.00 B | 0.00 B/s\r"));
    assert!(text.ends_with("Receiving objects:  25% (1/4), 2.00 KiB | 1024.00 B/s\r"));
}

#[test]
fn given_all_objects_received_when_rendered_then_line_completes_and_phase_advances() {
    let mut renderer = ProgressRenderer::new(Vec::new());
    let start = Instant::now();

    renderer
        .on_transfer_progress_at(&receiving(4, 4, 100), start)
        .unwrap();

    assert_eq!(renderer.state().phase, Phase::Resolving);
    assert!(renderer.state().receive_finish.is_some());
    assert!(output(renderer).ends_with("(4/4), 100.00 B | 0.00 B/s, done.\n"));
}

#[test]
fn given_full_transfer_when_rendered_then_phases_only_move_forward() {
    // Arrange
    let mut renderer = ProgressRenderer::new(Vec::new());
    let start = Instant::now();
    let mut phases = vec![renderer.state().phase];

    // Act
    for stats in [
        receiving(1, 10, 10),
        receiving(10, 10, 100),
        resolving(1, 3),
        resolving(3, 3),
    ] {
        renderer.on_transfer_progress_at(&stats, start).unwrap();
        phases.push(renderer.state().phase);
    }

    // Assert
    assert!(phases.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        phases,
        vec![
            Phase::None,
            Phase::Receiving,
            Phase::Resolving,
            Phase::Resolving,
            Phase::Done
        ]
    );
    let text = output(renderer);
    assert!(text.ends_with("Resolving deltas: 100% (3/3), done.\n"));
}

#[test]
fn given_done_when_more_stats_arrive_then_nothing_rendered() {
    // Arrange
    let mut renderer = ProgressRenderer::new(Vec::new());
    let start = Instant::now();
    renderer
        .on_transfer_progress_at(&receiving(1, 1, 1), start)
        .unwrap();
    renderer
        .on_transfer_progress_at(&resolving(0, 0), start)
        .unwrap();
    assert_eq!(renderer.state().phase, Phase::Done);
    let before = renderer.state().last_rendered_length;

    // Act
    renderer
        .on_transfer_progress_at(&resolving(5, 9), start)
        .unwrap();

    // Assert
    assert_eq!(renderer.state().last_rendered_length, before);
    let text = output(renderer);
    assert!(!text.contains("(5/9)"));
}

#[test]
fn given_zero_deltas_when_resolving_then_reports_complete() {
    let mut renderer = ProgressRenderer::new(Vec::new());
    let start = Instant::now();

    renderer
        .on_transfer_progress_at(&receiving(2, 2, 10), start)
        .unwrap();
    renderer
        .on_transfer_progress_at(&resolving(0, 0), start)
        .unwrap();

    assert!(output(renderer).ends_with("Resolving deltas: 100% (0/0), done.\n"));
}

#[test]
fn given_progress_line_after_longer_sideband_when_rendered_then_padded() {
    let mut renderer = ProgressRenderer::new(Vec::new());
    let start = Instant::now();
    let long = format!("{}\r", "x".repeat(80));

    renderer.on_sideband_message(long.as_bytes()).unwrap();
    renderer
        .on_transfer_progress_at(&receiving(0, 4, 0), start)
        .unwrap();

    let text = output(renderer);
    let second = text.split('\r').nth(1).unwrap();
    assert_eq!(second.len(), "remote: ".len() + 80);
    assert!(second.starts_with("Receiving objects:"));
}
