//! WASM API for the 6502 interpreter.
//!
//! Provides JavaScript-callable interfaces for loading images, CPU control and
//! state inspection.

use crate::{CpuView, FlatMemory, MemoryBus, Observer, RunControl, CPU};
use js_sys::{Function, Uint8Array};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

/// Calls a JavaScript function after every instruction.
///
/// The callback receives `(pc, opcode)`. Returning `false` stops the run.
struct JsObserver {
    callback: Function,
}

impl Observer<FlatMemory> for JsObserver {
    fn after_execution(&mut self, cpu: &CpuView<'_, FlatMemory>, control: &mut RunControl) {
        let opcode = cpu.instruction().map(|i| i.opcode).unwrap_or(0);

        match self.callback.call2(
            &JsValue::NULL,
            &JsValue::from(cpu.pc()),
            &JsValue::from(opcode),
        ) {
            Ok(result) if result.as_bool() == Some(false) => control.stop_emulation(),
            Ok(_) => {}
            Err(_) => control.stop_emulation(),
        }
    }
}

#[wasm_bindgen]
pub struct Emulator6502 {
    cpu: CPU<FlatMemory>,
}

impl Default for Emulator6502 {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Emulator6502 {
    /// Create a new interpreter with zeroed 64KB memory
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Emulator6502 {
            cpu: CPU::new(FlatMemory::new()),
        }
    }

    /// Register a per-instruction callback `(pc, opcode) => boolean | undefined`
    pub fn on_instruction(&mut self, callback: Function) {
        self.cpu.register_observer(Box::new(JsObserver { callback }));
    }

    /// Copy an image into memory starting at `start`
    pub fn load(&mut self, image: &[u8], start: u16) -> Result<(), JsError> {
        if image.is_empty() {
            return Ok(());
        }

        let end = start as usize + image.len() - 1;
        if end > 0xFFFF {
            return Err(JsError::new(&format!(
                "image of {} bytes does not fit at 0x{:04X}",
                image.len(),
                start
            )));
        }

        self.cpu
            .memory_mut()
            .load_range(image, start, end as u16)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Load PC from the reset vector
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Set PC without a reset
    pub fn start_at(&mut self, addr: u16) {
        self.cpu.set_pc(addr);
    }

    /// Execute a single instruction
    pub fn step(&mut self) -> Result<(), JsError> {
        self.cpu.step().map_err(|e| JsError::new(&e.to_string()))
    }

    /// Execute up to `max_instructions` and return how many ran
    pub fn run(&mut self, max_instructions: u32) -> Result<u32, JsError> {
        self.cpu
            .run_for_instructions(max_instructions as u64)
            .map(|n| n as u32)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.cpu.x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.cpu.y()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.cpu.sp()
    }

    /// Status byte as it would be pushed by a hardware interrupt
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.cpu.status().to_byte(false)
    }

    /// Instructions executed since creation
    #[wasm_bindgen(getter)]
    pub fn instructions_executed(&self) -> f64 {
        self.cpu.instructions_executed() as f64
    }

    // Memory access methods

    /// Read a single byte from memory
    pub fn read_memory(&self, addr: u16) -> u8 {
        self.cpu.memory().read(addr)
    }

    /// Write a single byte to memory
    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.cpu.memory_mut().write(addr, value);
    }

    /// Read a 256-byte page from memory (for efficient display)
    pub fn get_memory_page(&self, page: u8) -> Vec<u8> {
        let start = (page as usize) << 8;
        self.cpu.memory().as_slice()[start..start + 256].to_vec()
    }

    /// Copy of the full 64KB address space
    pub fn memory(&self) -> Uint8Array {
        Uint8Array::from(self.cpu.memory().as_slice())
    }
}
