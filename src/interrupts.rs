use lazy_static::lazy_static;
use pc_keyboard::{HandleControl, Keyboard, layouts, ScancodeSet1};
use pic8259::ChainedPics;
use spin::Mutex;
use x86_64::instructions::port::Port;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};
use crate::{gdt, hlt_loop, println};
use crate::drivers::pit;
use crate::events::KeyboardEvent;

static mut IDT: InterruptDescriptorTable = InterruptDescriptorTable::new();

pub fn init_idt() {
    unsafe {
        IDT.breakpoint.set_handler_fn(breakpoint_handler);
        IDT.overflow.set_handler_fn(overflow_handler);
        IDT.bound_range_exceeded.set_handler_fn(bound_range_exceeded_handler);
        IDT.general_protection_fault.set_handler_fn(general_protection_fault_handler);
        IDT.alignment_check.set_handler_fn(alignment_check_handler);
        IDT.divide_error.set_handler_fn(divide_error_handler);
        IDT.non_maskable_interrupt.set_handler_fn(non_maskable_interrupt_handler);
        IDT.invalid_opcode.set_handler_fn(invalid_opcode_handler);
        IDT.device_not_available.set_handler_fn(device_unavailable_handler);
        IDT.segment_not_present.set_handler_fn(segment_not_present_handler);
        IDT.stack_segment_fault.set_handler_fn(stack_segmentation_fault_handler);
        IDT.security_exception.set_handler_fn(security_handler);
        IDT.simd_floating_point.set_handler_fn(simd_floating_point_handler);
        IDT.x87_floating_point.set_handler_fn(x87_floating_point_handler);
        IDT.vmm_communication_exception.set_handler_fn(vmm_communication_handler);
        IDT.virtualization.set_handler_fn(virtualization_handler);
        IDT.debug.set_handler_fn(debug_handler);
        IDT.invalid_tss.set_handler_fn(invalid_tss_handler);
        IDT.page_fault.set_handler_fn(page_fault_handler);

        IDT.double_fault.set_handler_fn(double_fault_handler)
            .set_stack_index(gdt::DOUBLE_FAULT_IST_INDEX as u16);

        IDT[InterruptIndex::Timer.as_usize()]
            .set_handler_fn(timer_interrupt_handler);
        IDT[InterruptIndex::Keyboard.as_usize()]
            .set_handler_fn(keyboard_interrupt_handler);
    }
    unsafe { IDT.load(); }
}

extern "x86-interrupt" fn breakpoint_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: BREAKPOINT\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn divide_error_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: DIVIDE ERROR\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn debug_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: DEBUG\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn non_maskable_interrupt_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: NON MASKABLE INTERRUPT\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn overflow_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: OVERFLOW\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn bound_range_exceeded_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: OOB\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn invalid_opcode_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: INVALID OP CODE\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn device_unavailable_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: DEVICE UNAVAILABLE\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn invalid_tss_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: INVALID TSS\n{:#?}\nERROR CODE: {}", stack_frame, error_code);
}

extern "x86-interrupt" fn alignment_check_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: ALIGNMENT ERROR\n{:#?}\nERROR CODE: {}", stack_frame, error_code);
}

extern "x86-interrupt" fn segment_not_present_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: SEGMENT NOT PRESENT\n{:#?}\nERROR CODE: {}", stack_frame, error_code);
}

extern "x86-interrupt" fn x87_floating_point_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: X87 FLOATING POINT ERROR\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn simd_floating_point_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: SIMD FLOATING POINT ERROR\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn virtualization_handler(
    stack_frame: InterruptStackFrame)
{
    panic!("EXCEPTION: VIRTUALIZATION ERROR\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn vmm_communication_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: VMM COMMUNICATION ERROR\n{:#?}\nERROR CODE: {}", stack_frame, error_code);
}

extern "x86-interrupt" fn security_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: SECURITY ERROR\n{:#?}\nERROR CODE: {}", stack_frame, error_code);
}

extern "x86-interrupt" fn stack_segmentation_fault_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: STACK SEGMENTATION FAULT\n{:#?}\nERROR CODE: {}", stack_frame, error_code);
}

extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame, error_code: u64)
{
    panic!("EXCEPTION: GENERAL PROTECTION FAULT\n{:#?}\nError code: {}\n", stack_frame, error_code);
}

extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame, error_code: u64) -> !
{
    panic!("EXCEPTION: DOUBLE FAULT\n{:#?}\nError code: {}\n", stack_frame, error_code);
}

extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    println!("EXCEPTION: PAGE FAULT");
    println!("Accessed Address: {:?}", Cr2::read());
    println!("Error Code: {:?}", error_code);
    println!("{:#?}", stack_frame);
    hlt_loop();
}

pub const PIC_1_OFFSET: u8 = 32;
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

pub static PICS: spin::Mutex<ChainedPics> =
    spin::Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    Timer = PIC_1_OFFSET,
    Keyboard,
}

impl InterruptIndex {
    fn as_u8(self) -> u8 {
        self as u8
    }

    fn as_usize(self) -> usize {
        usize::from(self.as_u8())
    }
}

extern "x86-interrupt" fn timer_interrupt_handler(
    _stack_frame: InterruptStackFrame)
{
    pit::handle_timer();
    unsafe {
        PICS.lock().notify_end_of_interrupt(InterruptIndex::Timer.as_u8());
    }
}

extern "x86-interrupt" fn keyboard_interrupt_handler(
    _stack_frame: InterruptStackFrame)
{
    lazy_static! {
        static ref KEYBOARD: Mutex<Keyboard<layouts::Us104Key, ScancodeSet1>> =
            Mutex::new(Keyboard::new(layouts::Us104Key, ScancodeSet1,
                HandleControl::Ignore)
            );
    }

    let mut keyboard = KEYBOARD.lock();
    let mut port = Port::new(0x60);

    let scancode: u8 = unsafe { port.read() };
    if let Ok(Some(key_event)) = keyboard.add_byte(scancode) {
        if let Some(key) = keyboard.process_keyevent(key_event) {
            crate::events::EVENT_HANDLERS.lock().call_keyboard_event(KeyboardEvent {
                key,
            });
        }
    }
    unsafe {
        PICS.lock().notify_end_of_interrupt(InterruptIndex::Keyboard.as_u8());
    }
}

#[test_case]
fn test_breakpoint_exception() {
    // invoke a breakpoint exception
    x86_64::instructions::interrupts::int3();
}
