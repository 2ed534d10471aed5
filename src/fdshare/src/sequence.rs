//! The demonstration itself: one linear run over a primary descriptor and
//! its duplicate.
//!
//! The run is a strict state machine. Each step either advances to the next
//! [`Stage`] or fails; on failure every descriptor still open is closed
//! before the error is handed back, and close failures during that cleanup
//! are kept next to the first error instead of replacing it.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use sysdefs::constants::demo_const::{
    DEMO_FILE_MODE, DEMO_FILE_PATH, DEMO_OPEN_FLAGS, FIRST_PAYLOAD, READ_BUF_SIZE, SECOND_PAYLOAD,
    SECOND_REQUEST_LEN, THIRD_PAYLOAD,
};
use sysdefs::constants::err_const::Errno;
use tracing::{debug, error, info, instrument};

use crate::descriptor::FileDescriptor;
use crate::dump::{c_str_prefix, dump_buffer, dump_file, FileDump};
use crate::error::{output_error, syscall_error, DemoFailure, ErrorKind, SyscallError};
use crate::fs_calls::WriteOutcome;
use crate::inspect::{check_flags, check_offsets, Comparison, FlagReport, OffsetReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Opened,
    Duplicated,
    FlagsChecked,
    /// n-th offset comparison, 1 through 5.
    OffsetsChecked(u8),
    WroteA,
    /// Second write, through the duplicate; extends the file.
    WroteB,
    WroteBAgain,
    Rewound,
    BulkRead,
    PrintedAsString,
    PrintedBufferChars,
    PrintedFileChars,
    ClosedB,
    ClosedA,
    Done,
}

impl Stage {
    /// The only stage allowed to follow `self`.
    pub fn next(self) -> Option<Stage> {
        use Stage::*;
        let next = match self {
            Start => Opened,
            Opened => Duplicated,
            Duplicated => FlagsChecked,
            FlagsChecked => OffsetsChecked(1),
            OffsetsChecked(1) => WroteA,
            WroteA => OffsetsChecked(2),
            OffsetsChecked(2) => WroteB,
            WroteB => OffsetsChecked(3),
            OffsetsChecked(3) => WroteBAgain,
            WroteBAgain => OffsetsChecked(4),
            OffsetsChecked(4) => Rewound,
            Rewound => BulkRead,
            BulkRead => OffsetsChecked(5),
            OffsetsChecked(5) => PrintedAsString,
            OffsetsChecked(_) => return None,
            PrintedAsString => PrintedBufferChars,
            PrintedBufferChars => PrintedFileChars,
            PrintedFileChars => ClosedB,
            ClosedB => ClosedA,
            ClosedA => Done,
            Done => return None,
        };
        Some(next)
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Done
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::OffsetsChecked(n) => write!(f, "OffsetsChecked{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Parameters of a run. `Default` is the fixed demonstration setup.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub path: PathBuf,
    pub oflag: i32,
    pub mode: u32,
    pub read_buf_size: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            path: PathBuf::from(DEMO_FILE_PATH),
            oflag: DEMO_OPEN_FLAGS,
            mode: DEMO_FILE_MODE,
            read_buf_size: READ_BUF_SIZE,
        }
    }
}

impl DemoConfig {
    /// Same setup, different backing file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        DemoConfig {
            path: path.into(),
            ..DemoConfig::default()
        }
    }
}

/// Everything observed during a successful run.
#[derive(Debug, Clone, Default)]
pub struct DemoSummary {
    pub primary_fd: i32,
    pub duplicate_fd: i32,
    pub flags: Option<FlagReport>,
    pub offsets: Vec<OffsetReport>,
    pub writes: Vec<WriteOutcome>,
    /// Count returned by the bulk read.
    pub bytes_read: usize,
    /// The whole fixed buffer after the bulk read, unread tail included.
    pub buffer: Vec<u8>,
    /// Length a string-oriented reader sees in `buffer`.
    pub string_len: usize,
    pub file: Option<FileDump>,
    /// Flag or offset comparisons that came back `Unequal`.
    pub mismatches: usize,
}

impl DemoSummary {
    pub fn short_writes(&self) -> usize {
        self.writes.iter().filter(|w| w.is_short()).count()
    }
}

pub(crate) struct Demo<'a, W: Write> {
    config: &'a DemoConfig,
    out: &'a mut W,
    pub(crate) stage: Stage,
    pub(crate) primary: Option<FileDescriptor>,
    pub(crate) duplicate: Option<FileDescriptor>,
    summary: DemoSummary,
}

impl<'a, W: Write> Demo<'a, W> {
    pub(crate) fn new(config: &'a DemoConfig, out: &'a mut W) -> Self {
        Demo {
            config,
            out,
            stage: Stage::Start,
            primary: None,
            duplicate: None,
            summary: DemoSummary::default(),
        }
    }

    fn advance(&mut self, to: Stage) {
        debug_assert_eq!(self.stage.next(), Some(to), "out-of-order transition");
        info!(from = %self.stage, to = %to, "stage");
        self.stage = to;
    }

    fn say(&mut self, args: fmt::Arguments<'_>) -> Result<(), SyscallError> {
        self.out.write_fmt(args).map_err(output_error)
    }

    fn handles(&self) -> Result<(&FileDescriptor, &FileDescriptor), SyscallError> {
        match (self.primary.as_ref(), self.duplicate.as_ref()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(syscall_error(ErrorKind::Inspect, Errno::EBADF, "handles", "descriptor already released")),
        }
    }

    fn primary(&self) -> Result<&FileDescriptor, SyscallError> {
        self.primary
            .as_ref()
            .ok_or_else(|| syscall_error(ErrorKind::Read, Errno::EBADF, "handles", "primary descriptor already released"))
    }

    fn duplicate(&self) -> Result<&FileDescriptor, SyscallError> {
        self.duplicate
            .as_ref()
            .ok_or_else(|| syscall_error(ErrorKind::Write, Errno::EBADF, "handles", "duplicate descriptor already released"))
    }

    fn compare_offsets(&mut self, n: u8) -> Result<(), SyscallError> {
        let report = {
            let (a, b) = self.handles()?;
            check_offsets(a, b)?
        };
        if report.comparison == Comparison::Unequal {
            self.summary.mismatches += 1;
        }
        self.say(format_args!("{}", report))?;
        self.summary.offsets.push(report);
        self.advance(Stage::OffsetsChecked(n));
        Ok(())
    }

    fn record_write(&mut self, outcome: WriteOutcome, to: Stage) {
        self.summary.writes.push(outcome);
        self.advance(to);
    }

    #[instrument(skip_all, name = "demo")]
    fn drive(&mut self) -> Result<(), SyscallError> {
        let path = self.config.path.to_string_lossy().into_owned();
        info!(%path, "starting");

        let primary = FileDescriptor::open(&path, self.config.oflag, self.config.mode, "newfd1")?;
        let newfd1 = primary.raw();
        self.summary.primary_fd = newfd1;
        self.primary = Some(primary);
        self.say(format_args!("\nnewfd1 = {}\n", newfd1))?;
        self.advance(Stage::Opened);

        let duplicate = self.primary()?.duplicate("newfd2")?;
        let newfd2 = duplicate.raw();
        self.summary.duplicate_fd = newfd2;
        self.duplicate = Some(duplicate);
        self.say(format_args!(
            "newfd2, which points to same open file description as newfd1: {}\n",
            newfd2
        ))?;
        self.advance(Stage::Duplicated);

        let flags = {
            let (a, b) = self.handles()?;
            check_flags(a, b)?
        };
        if flags.comparison == Comparison::Unequal {
            self.summary.mismatches += 1;
        }
        self.say(format_args!("{}", flags))?;
        self.summary.flags = Some(flags);
        self.advance(Stage::FlagsChecked);

        self.compare_offsets(1)?;

        let outcome = self.primary()?.write(FIRST_PAYLOAD, FIRST_PAYLOAD.len())?;
        self.record_write(outcome, Stage::WroteA);
        self.say(format_args!(
            "\nChecking offsets after writing {} characters to newfd1\n",
            outcome.requested
        ))?;
        self.compare_offsets(2)?;

        let outcome = self.duplicate()?.write(SECOND_PAYLOAD, SECOND_REQUEST_LEN)?;
        self.record_write(outcome, Stage::WroteB);
        self.say(format_args!(
            "\nChecking offsets after writing {} characters to newfd2\n",
            outcome.requested
        ))?;
        self.say(format_args!("File holes shouldn't matter for the offsets.\n"))?;
        self.compare_offsets(3)?;

        let outcome = self.duplicate()?.write(THIRD_PAYLOAD, THIRD_PAYLOAD.len())?;
        self.record_write(outcome, Stage::WroteBAgain);
        self.say(format_args!(
            "\nChecking offsets after writing {} characters to newfd2\n",
            outcome.requested
        ))?;
        self.compare_offsets(4)?;

        self.primary()?.rewind()?;
        self.advance(Stage::Rewound);

        let mut filebuf = vec![0u8; self.config.read_buf_size];
        let bytes_read = self.primary()?.read(&mut filebuf)?;
        debug!(bytes_read, capacity = filebuf.len(), "bulk read");
        self.summary.bytes_read = bytes_read;
        self.advance(Stage::BulkRead);

        self.compare_offsets(5)?;

        let shown = c_str_prefix(&filebuf);
        let string_len = shown.len();
        self.say(format_args!("\nWriting buffer read from file:\n\n###############\n\n"))?;
        self.out.write_all(shown).map_err(output_error)?;
        self.say(format_args!("\n\n##############\n\n"))?;
        self.say(format_args!(
            "sizeof(filebuf) = {}. strlen(filebuf) = {}\n",
            filebuf.len(),
            string_len
        ))?;
        if string_len < bytes_read {
            self.say(format_args!(
                "printf() and strlen() functions stopped at the file hole, but the read() function didn't.\n"
            ))?;
        } else {
            self.say(format_args!(
                "No zero byte among the {} bytes read, so printf() and strlen() saw all of them.\n",
                bytes_read
            ))?;
        }
        self.summary.string_len = string_len;
        self.advance(Stage::PrintedAsString);

        self.say(format_args!(
            "\nPrinting all the characters in the {} character buffer:\n\n##############\n\n",
            filebuf.len()
        ))?;
        dump_buffer(&mut *self.out, &filebuf)?;
        self.say(format_args!("\n\n##############\n\n"))?;
        self.summary.buffer = filebuf;
        self.advance(Stage::PrintedBufferChars);

        let file = {
            let primary = self
                .primary
                .as_ref()
                .ok_or_else(|| syscall_error(ErrorKind::Read, Errno::EBADF, "handles", "primary descriptor already released"))?;
            dump_file(&mut *self.out, primary)?
        };
        self.summary.file = Some(file);
        self.advance(Stage::PrintedFileChars);

        if let Some(duplicate) = self.duplicate.take() {
            duplicate.close()?;
        }
        self.advance(Stage::ClosedB);

        if let Some(primary) = self.primary.take() {
            primary.close()?;
        }
        self.advance(Stage::ClosedA);

        self.say(format_args!("We're golden.\n"))?;
        self.out.flush().map_err(output_error)?;
        self.advance(Stage::Done);
        Ok(())
    }

    /// Closes whatever is still open, duplicate first.
    pub(crate) fn release(&mut self) -> Vec<SyscallError> {
        let mut cleanup = Vec::new();
        for handle in [self.duplicate.take(), self.primary.take()].into_iter().flatten() {
            let label = handle.label();
            if let Err(e) = handle.close() {
                error!(label, %e, "close during cleanup failed");
                cleanup.push(e);
            }
        }
        cleanup
    }

    /// Releases the handles and wraps `err` with the stage it interrupted.
    pub(crate) fn fail(mut self, err: SyscallError) -> DemoFailure {
        error!(stage = %self.stage, %err, "demonstration aborted");
        let cleanup = self.release();
        DemoFailure {
            stage: self.stage,
            error: err,
            cleanup,
        }
    }
}

/// Runs the whole sequence against `config.path`, writing the demonstration
/// text to `out` and flushing it before reporting success.
pub fn run_demo<W: Write>(config: &DemoConfig, out: &mut W) -> Result<DemoSummary, DemoFailure> {
    let mut demo = Demo::new(config, out);
    match demo.drive() {
        Ok(()) => Ok(std::mem::take(&mut demo.summary)),
        Err(err) => Err(demo.fail(err)),
    }
}
