//! Tests for the in-place terminal redraw

use super::terminal::TerminalDisplay;
use super::DisplaySink;
use crate::stream::DisplayUpdate;
use std::io::Write;
use std::sync::{Arc, Mutex};

// Captures everything written to the display
#[derive(Clone, Default)]
struct TestWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestWriter {
    fn get_output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).to_string()
    }
}

impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn create_test_display() -> (TerminalDisplay, TestWriter) {
    let writer = TestWriter::default();
    let display = TerminalDisplay::with_writer(Box::new(writer.clone()));
    (display, writer)
}

#[test]
fn test_first_render_is_written_as_is() {
    let (mut display, writer) = create_test_display();

    display
        .show(&DisplayUpdate::Render(
            "**Optimized Prompt:**\nWrite a haiku".to_string(),
        ))
        .unwrap();

    assert_eq!(writer.get_output(), "**Optimized Prompt:**\nWrite a haiku\n");
}

#[test]
fn test_rerender_erases_previous_rows() {
    let (mut display, writer) = create_test_display();

    display
        .show(&DisplayUpdate::Render("line one\nline two".to_string()))
        .unwrap();
    display
        .show(&DisplayUpdate::Render("line one\nline two!".to_string()))
        .unwrap();

    let output = writer.get_output();
    // Move up two lines, then clear to the end of the screen
    assert!(output.contains("\x1b[2F\x1b[J"), "output: {output:?}");
    assert!(output.ends_with("line one\nline two!\n"));
}

#[test]
fn test_final_render_stays_on_screen() {
    let (mut display, writer) = create_test_display();

    display
        .show(&DisplayUpdate::Final("Done".to_string()))
        .unwrap();
    display
        .show(&DisplayUpdate::Render("Next".to_string()))
        .unwrap();

    assert_eq!(writer.get_output(), "Done\nNext\n");
}

#[test]
fn test_failure_notice_keeps_last_render() {
    let (mut display, writer) = create_test_display();

    display
        .show(&DisplayUpdate::Render("partial".to_string()))
        .unwrap();
    display
        .show(&DisplayUpdate::Failed {
            message: "quota exceeded".to_string(),
            last_render: Some("partial".to_string()),
        })
        .unwrap();
    display.show(&DisplayUpdate::Ignored).unwrap();

    assert_eq!(
        writer.get_output(),
        "partial\n✗ Optimization failed: quota exceeded\n"
    );
}
