#![allow(dead_code)]

use {
    regex::Regex,
    std::{
        io,
        sync::{Arc, Mutex},
    },
};

/// In-memory writer shared between a logger and the test.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

/// Matches a full log line and captures level, module, submodule and message.
pub fn line_pattern() -> Regex {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}) \[(DEBUG|INFO |WARN |ERROR|FATAL)\] \[([^\]]*)\] (\S*) - (.*)$",
    )
    .unwrap()
}
