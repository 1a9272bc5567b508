#![no_std] // don't link the Rust standard library
#![no_main] // disable all Rust-level entry points
#![feature(custom_test_frameworks)]
#![test_runner(crate::test_runner)]
#![reexport_test_harness_main = "test_main"]

extern crate alloc;

mod vga_buffer;
mod serial;
mod drivers;
mod process;

use core::panic::PanicInfo;
use bootloader::{BootInfo, entry_point};
use x86_64::VirtAddr;
use teros::{allocator, hlt_loop, memory, print, println};
use teros::memory::BootInfoFrameAllocator;
use teros::ternary::{Interpreter, Trit};
use teros::ternary::isa::{Instruction, Opcode};
use teros::ipc::pipe::PipeTable;
use teros::ipc::semaphore::SemaphoreTable;
use teros::ipc::mqueue::{MessageQueueTable, PRIORITY_HIGH, PRIORITY_NORMAL};

// working build command:
// cargo bootimage --release --target x86_64_target.json -Z build-std=core,compiler_builtins,alloc -Z build-std-features=compiler-builtins-mem
// qemu-system-x86_64 -drive format=raw,file=target/x86_64_target/release/bootimage-teros.bin

entry_point!(kernel_main);

fn kernel_main(boot_info: &'static BootInfo) -> ! {
    println!("Initializing...");

    teros::init();

    println!("Initialization succeeded!");

    let phys_mem_offset = VirtAddr::new(boot_info.physical_memory_offset);
    let mut mapper = unsafe { memory::init(phys_mem_offset) };
    let mut frame_allocator = unsafe { BootInfoFrameAllocator::init(&boot_info.memory_map) };
    allocator::init_heap(&mut mapper, &mut frame_allocator)
        .expect("heap initialization failed");

    #[cfg(test)]
    test_main();

    run_ternary_demo();
    run_ipc_demo();

    println!("Startup succeeded!");

    hlt_loop();
}

/// Runs a small T3-ISA program to prove the interpreter boots end to end:
/// load +1 and -1 into R0/R1, add them, halt.
fn run_ternary_demo() {
    let mut interp = Interpreter::new(1024);
    interp.load_program(alloc::vec![
        Instruction::new(Opcode::Load, 0, 0, 0, 1),
        Instruction::new(Opcode::Load, 1, 0, 0, -1),
        Instruction::new(Opcode::Add, 0, 0, 1, 0),
        Instruction::simple(Opcode::Halt),
    ]);
    interp.run(64);
    println!(
        "ternary demo: halted={} error={} r0={}",
        interp.is_halted(),
        interp.has_error(),
        interp.vm.get_register(0)
    );
    debug_assert_eq!(interp.vm.get_register(0), Trit::Neu);
}

/// Exercises a pipe, a semaphore, and a priority message queue to prove
/// the IPC core's basic contracts hold.
fn run_ipc_demo() {
    let mut pipes = PipeTable::new();
    let fd = pipes.open().expect("pipe table full");
    pipes.write(fd, b"hi").expect("pipe write failed");
    let mut buf = [0u8; 2];
    pipes.read(fd, &mut buf).expect("pipe read failed");
    println!("ipc demo: pipe round-trip = {:?}", buf);

    let mut sems = SemaphoreTable::new();
    let sem = sems.open(1).expect("semaphore table full");
    sems.wait(sem).expect("semaphore wait failed");
    sems.post(sem).expect("semaphore post failed");
    println!("ipc demo: semaphore value = {}", sems.value(sem).unwrap());

    let mut queues = MessageQueueTable::new();
    let mq = queues.open(4, 32).expect("queue table full");
    queues.send(mq, b"normal", PRIORITY_NORMAL).unwrap();
    queues.send(mq, b"urgent", PRIORITY_HIGH).unwrap();
    let mut out = [0u8; 32];
    let (n, priority) = queues.receive(mq, &mut out).unwrap();
    println!("ipc demo: first message priority={} bytes={}", priority, n);
}

/// This function is called on panic.
#[cfg(not(test))]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    println!("{}", info);
    hlt_loop();
}

/// This function is called on test failure or when a panic occurs during testing.
#[cfg(test)]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("[failed]\n");
    serial_println!("Error: {}\n", info);
    exit_qemu(QemuExitCode::Failed);
    hlt_loop();
}

#[cfg(test)]
fn test_runner(tests: &[&dyn Testable]) {
    serial_println!("Running {} tests", tests.len());
    for test in tests {
        test.run();
    }
    exit_qemu(QemuExitCode::Success);
}

pub trait Testable {
    fn run(&self) -> ();
}

impl<T> Testable for T
    where
        T: Fn(),
{
    fn run(&self) {
        serial_print!("{}...\t", core::any::type_name::<T>());
        self();
        serial_println!("[ok]");
    }
}

#[test_case]
fn trivial_assertion() {
    assert_eq!(1, 1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum QemuExitCode {
    Success = 0x10,
    Failed = 0x11,
}

pub fn exit_qemu(exit_code: QemuExitCode) {
    use x86_64::instructions::port::Port;

    unsafe {
        let mut port = Port::new(0xf4);
        port.write(exit_code as u32);
    }
}

// https://os.phil-opp.com/minimal-rust-kernel/#target-specification
