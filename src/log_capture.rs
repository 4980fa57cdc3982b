// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Captures formatted `tracing` output for assertions in unit tests.

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default,)]
struct CapturedLogs(Arc<Mutex<Vec<u8,>,>,>,);

impl io::Write for CapturedLogs
{
    fn write(&mut self, buf: &[u8],) -> io::Result<usize,>
    {
        self.0.lock().expect("log buffer poisoned",).extend_from_slice(buf,);
        Ok(buf.len(),)
    }

    fn flush(&mut self,) -> io::Result<(),>
    {
        Ok((),)
    }
}

impl<'a,> MakeWriter<'a,> for CapturedLogs
{
    type Writer = CapturedLogs;

    fn make_writer(&'a self,) -> Self::Writer
    {
        self.clone()
    }
}

/// Runs `action` with a thread-local subscriber and returns its result
/// together with every event at `WARN` or above.
pub(crate) fn capture_warnings<T, F,>(action: F,) -> (T, String,)
where
    F: FnOnce() -> T,
{
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone(),)
        .with_ansi(false,)
        .with_max_level(Level::WARN,)
        .finish();

    let value = tracing::subscriber::with_default(subscriber, action,);
    let output = String::from_utf8_lossy(&logs.0.lock().expect("log buffer poisoned",),).into_owned();
    (value, output,)
}
