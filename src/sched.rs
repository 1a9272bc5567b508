use core::hint::spin_loop;

/// Cooperative yield point for the single-CPU kernel. Blocking IPC
/// primitives spin on this instead of descheduling a task, since there
/// is no preemptive task switcher in this build.
pub fn yield_now() {
    spin_loop();
}
