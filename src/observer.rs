//! # Observer Hooks
//!
//! Observers are registered on the CPU and invoked once after every completed
//! instruction, synchronously and in registration order. They are used for
//! debugging output, deliberate slow-down and peripheral polling.
//!
//! An observer only ever sees a [`CpuView`], a read-only snapshot of the
//! registers plus a shared borrow of memory, so it cannot mutate engine state.
//! The one thing it may do is ask the run loop to stop through [`RunControl`];
//! the request is honored before the next fetch, never mid-instruction.
//!
//! ```
//! use step6502::{CPU, CpuView, FlatMemory, MemoryBus, Observer, RunControl};
//!
//! /// Stops as soon as the accumulator holds 0x42.
//! struct StopOnAnswer;
//!
//! impl<M: MemoryBus> Observer<M> for StopOnAnswer {
//!     fn after_execution(&mut self, cpu: &CpuView<'_, M>, control: &mut RunControl) {
//!         if cpu.a() == 0x42 {
//!             control.stop_emulation();
//!         }
//!     }
//! }
//!
//! let mut memory = FlatMemory::new();
//! memory.load_range(&[0xA9, 0x42], 0x0200, 0x0201).unwrap(); // LDA #$42
//!
//! let mut cpu = CPU::new(memory);
//! cpu.register_observer(Box::new(StopOnAnswer));
//! cpu.start_at_address(0x0200).unwrap();
//!
//! assert_eq!(cpu.a(), 0x42);
//! assert_eq!(cpu.pc(), 0x0202);
//! ```

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use crate::{MemoryBus, OpcodeMetadata, Status};

/// Capability invoked after every executed instruction.
pub trait Observer<M: MemoryBus> {
    /// Called once per completed instruction, before any pending interrupt is serviced.
    fn after_execution(&mut self, cpu: &CpuView<'_, M>, control: &mut RunControl);
}

/// Stop signal handed to observers.
#[derive(Debug, Default)]
pub struct RunControl {
    stop_requested: bool,
}

impl RunControl {
    /// Asks the emulation loop to stop before the next instruction is fetched.
    pub fn stop_emulation(&mut self) {
        self.stop_requested = true;
    }

    /// Whether any observer asked for a stop during this notification pass.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

/// Read-only view of the CPU handed to observers.
pub struct CpuView<'a, M: MemoryBus> {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) sp: u8,
    pub(crate) pc: u16,
    pub(crate) status: Status,
    pub(crate) instruction: Option<OpcodeMetadata>,
    pub(crate) instructions_executed: u64,
    pub(crate) memory: &'a M,
}

impl<M: MemoryBus> CpuView<'_, M> {
    /// Accumulator.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// X index register.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Y index register.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Stack pointer.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Program counter after the instruction (and any PC change it made).
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Processor status flags.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The instruction that just completed.
    pub fn instruction(&self) -> Option<OpcodeMetadata> {
        self.instruction
    }

    /// Number of instructions completed since the CPU was created.
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    /// Shared access to memory.
    pub fn memory(&self) -> &M {
        self.memory
    }
}

/// Prints the result of every instruction.
///
/// Optionally dumps the zero page, pauses for a line on stdin between
/// instructions (`step`), or sleeps for a fixed time to slow execution down to
/// a watchable pace.
pub struct DebugObserver<W: Write> {
    out: W,
    slow_down: Option<Duration>,
    step: bool,
    show_zero_page: bool,
}

impl DebugObserver<io::Stdout> {
    /// Creates a debug observer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DebugObserver<W> {
    /// Creates a debug observer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            slow_down: None,
            step: false,
            show_zero_page: false,
        }
    }

    /// Sleeps for `delay` after each report. Ignored in step mode.
    pub fn with_slow_down(mut self, delay: Duration) -> Self {
        self.slow_down = Some(delay).filter(|d| !d.is_zero());
        self
    }

    /// Waits for a line on stdin after each report.
    pub fn with_step(mut self, step: bool) -> Self {
        self.step = step;
        self
    }

    /// Appends a hex dump of 0x0000-0x00FF to each report.
    pub fn with_zero_page(mut self, show: bool) -> Self {
        self.show_zero_page = show;
        self
    }

    /// Consumes the observer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn report<M: MemoryBus>(&mut self, cpu: &CpuView<'_, M>) -> io::Result<()> {
        writeln!(self.out)?;
        match cpu.instruction() {
            Some(instruction) => writeln!(
                self.out,
                "Result of instruction 0x{:02X} ({}, {:?})",
                instruction.opcode, instruction.mnemonic, instruction.addressing_mode
            )?,
            None => writeln!(self.out, "Result of instruction (none)")?,
        }

        let status = cpu.status();
        writeln!(
            self.out,
            "Neg: {}, Ovr: {}, Dec: {}, Int: {}, Zer: {}, Car: {}",
            status.negative,
            status.overflow,
            status.decimal,
            status.interrupt_disable,
            status.zero,
            status.carry
        )?;
        writeln!(
            self.out,
            "PC: 0x{:04X}, SP: 0x{:02X}, A: 0x{:02X}, X: 0x{:02X}, Y: 0x{:02X}",
            cpu.pc(),
            cpu.sp(),
            cpu.a(),
            cpu.x(),
            cpu.y()
        )?;

        if self.show_zero_page {
            writeln!(self.out, "Zeropage:")?;
            for row in (0x00u16..0x100).step_by(0x10) {
                write!(self.out, "0x{:04X}:", row)?;
                for addr in row..row + 0x10 {
                    write!(self.out, " {:02X}", cpu.memory().read(addr))?;
                }
                writeln!(self.out)?;
            }
        }

        self.out.flush()
    }
}

impl<M: MemoryBus, W: Write> Observer<M> for DebugObserver<W> {
    fn after_execution(&mut self, cpu: &CpuView<'_, M>, control: &mut RunControl) {
        if let Err(err) = self.report(cpu) {
            log::warn!("debug output failed, stopping: {}", err);
            control.stop_emulation();
            return;
        }

        if self.step {
            if !wait_for_line(&mut io::stdin().lock()) {
                log::debug!("no more input in step mode, stopping");
                control.stop_emulation();
            }
        } else if let Some(delay) = self.slow_down {
            thread::sleep(delay);
        }
    }
}

/// Blocks until a line arrives. Returns `false` at end of input or on a read error.
fn wait_for_line<R: BufRead>(input: &mut R) -> bool {
    let mut line = String::new();
    matches!(input.read_line(&mut line), Ok(n) if n > 0)
}

/// Stops emulation once a fixed number of instructions has completed.
#[derive(Debug, Clone)]
pub struct InstructionLimit {
    limit: u64,
    seen: u64,
}

impl InstructionLimit {
    /// Stops after `limit` instructions have executed under this observer.
    ///
    /// Observers only run after an instruction, so a limit of 0 still lets one
    /// instruction through.
    pub fn new(limit: u64) -> Self {
        Self { limit, seen: 0 }
    }
}

impl<M: MemoryBus> Observer<M> for InstructionLimit {
    fn after_execution(&mut self, _cpu: &CpuView<'_, M>, control: &mut RunControl) {
        self.seen += 1;
        if self.seen >= self.limit {
            log::debug!("instruction limit of {} reached", self.limit);
            control.stop_emulation();
        }
    }
}

/// Sleeps for a fixed time after every instruction.
///
/// The silent counterpart of [`DebugObserver::with_slow_down`].
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Creates a throttle that pauses for `delay` after each instruction.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The pause applied after each instruction.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<M: MemoryBus> Observer<M> for Throttle {
    fn after_execution(&mut self, _cpu: &CpuView<'_, M>, _control: &mut RunControl) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
