//! The debug/step controller
//!
//! A cooperative gate around the synchronous evaluator with two states,
//! running and paused. The executor calls [`DebugController::check_line`]
//! at every statement boundary; the call pauses when the line holds a
//! breakpoint or a pending step request's depth condition is met, then
//! blocks the evaluating thread on a line-oriented command loop until a
//! resume command arrives. No separate thread ever runs evaluation.
//!
//! Breakpoint state is shared with a background listener thread that reads
//! commands while the program runs: the listener writes the breakpoint set
//! (a `DashSet`) and the evaluator reads it, with atomics for the
//! paused/quit flags. While paused, the listener forwards input lines over
//! a channel to the blocked command loop instead.
//!
//! Registered timers are paused on entry to the paused state and resumed
//! on exit, keeping callback-driven side effects aligned with
//! single-stepped evaluation.

use std::io::{BufRead, Write};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use dashmap::DashSet;
use indexmap::IndexMap;

use crate::environment::Environment;
use crate::value::Builtin;

/// A timer the debugger can pause and resume.
///
/// The GUI toolkit binding implements this for its timer objects and
/// registers them with the interpreter.
pub trait PausableTimer {
    /// Stop the timer.
    fn pause(&self);
    /// Restart the timer.
    fn resume(&self);
    /// Whether the timer is currently firing.
    fn is_running(&self) -> bool;
}

/// Registry of timers subject to debugger pause/resume.
#[derive(Default)]
pub struct TimerRegistry {
    timers: Vec<Rc<dyn PausableTimer>>,
    paused: Vec<Rc<dyn PausableTimer>>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer.
    pub fn register(&mut self, timer: Rc<dyn PausableTimer>) {
        self.timers.push(timer);
    }

    /// Remove a timer (by identity).
    pub fn unregister(&mut self, timer: &Rc<dyn PausableTimer>) {
        self.timers.retain(|t| !Rc::ptr_eq(t, timer));
    }

    /// Pause every running timer; returns how many were paused.
    pub fn pause_all(&mut self) -> usize {
        for timer in &self.timers {
            if timer.is_running() {
                timer.pause();
                self.paused.push(timer.clone());
            }
        }
        self.paused.len()
    }

    /// Resume the timers paused by the last [`TimerRegistry::pause_all`];
    /// returns how many were resumed.
    pub fn resume_all(&mut self) -> usize {
        let count = self.paused.len();
        for timer in self.paused.drain(..) {
            timer.resume();
        }
        count
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are registered.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// State shared between the evaluating thread and the listener thread.
#[derive(Debug, Default)]
struct DebugShared {
    breakpoints: DashSet<u32>,
    paused: AtomicBool,
    quit: AtomicBool,
}

/// Pending step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StepMode {
    /// No step pending
    #[default]
    None,
    /// Pause at the next statement, entering calls
    Into,
    /// Pause at the next statement at or above the recorded depth
    Over {
        /// Call depth when the step was requested
        depth: usize,
    },
    /// Pause once the call depth drops below the recorded depth
    Out {
        /// Target depth (request depth minus one)
        target: i64,
    },
}

/// The breakpoint/stepping controller.
pub struct DebugController {
    enabled: bool,
    shared: Arc<DebugShared>,
    commands: Option<Receiver<String>>,
    out: Box<dyn Write>,
    step: StepMode,
}

impl Default for DebugController {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugController {
    /// Create a disabled controller writing protocol output to stdout.
    pub fn new() -> Self {
        Self {
            enabled: false,
            shared: Arc::new(DebugShared::default()),
            commands: None,
            out: Box::new(std::io::stdout()),
            step: StepMode::None,
        }
    }

    /// Enable debug mode, spawning the stdin listener thread.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;

        let (tx, rx) = std::sync::mpsc::channel();
        let shared = self.shared.clone();
        std::thread::spawn(move || listen_stdin(shared, tx));
        self.commands = Some(rx);
    }

    /// Enable debug mode with an injected command source and output sink.
    /// Used by front ends that own their I/O, and by tests.
    pub fn enable_with(&mut self, commands: Receiver<String>, out: Box<dyn Write>) {
        self.enabled = true;
        self.commands = Some(commands);
        self.out = out;
    }

    /// Whether debug mode is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Register a breakpoint.
    pub fn add_breakpoint(&mut self, line: u32) {
        self.shared.breakpoints.insert(line);
    }

    /// Remove a breakpoint; returns whether one was present.
    pub fn remove_breakpoint(&mut self, line: u32) -> bool {
        self.shared.breakpoints.remove(&line).is_some()
    }

    /// Drop all breakpoints.
    pub fn clear_breakpoints(&mut self) {
        self.shared.breakpoints.clear();
    }

    /// Registered breakpoints, sorted.
    pub fn breakpoints(&self) -> Vec<u32> {
        let mut lines: Vec<u32> = self.shared.breakpoints.iter().map(|l| *l).collect();
        lines.sort_unstable();
        lines
    }

    /// Statement-boundary check: pause when the line holds a breakpoint or
    /// a pending step request is satisfied at this call depth.
    pub fn check_line(
        &mut self,
        line: u32,
        depth: usize,
        env: &Environment,
        builtins: &IndexMap<String, Builtin>,
        timers: &mut TimerRegistry,
    ) {
        if !self.enabled {
            return;
        }
        if self.shared.quit.load(Ordering::SeqCst) {
            std::process::exit(0);
        }

        let should_pause = self.shared.breakpoints.contains(&line)
            || match self.step {
                StepMode::None => false,
                StepMode::Into => true,
                StepMode::Over { depth: d } => depth <= d,
                StepMode::Out { target } => (depth as i64) <= target,
            };
        if !should_pause {
            return;
        }

        self.shared.paused.store(true, Ordering::SeqCst);
        let paused_timers = timers.pause_all();

        let _ = writeln!(self.out, "Debug: paused at line {} (depth {})", line, depth);
        if paused_timers > 0 {
            let _ = writeln!(self.out, "Debug: paused {} timers", paused_timers);
        }
        self.emit_ide_blocks(env, builtins);

        self.command_loop(depth, env);

        self.shared.paused.store(false, Ordering::SeqCst);
        let resumed = timers.resume_all();
        if resumed > 0 {
            let _ = writeln!(self.out, "Debug: resumed {} timers", resumed);
        }
    }

    fn command_loop(&mut self, depth: usize, env: &Environment) {
        loop {
            let _ = write!(self.out, "Debug> ");
            let _ = self.out.flush();

            let line = match &self.commands {
                Some(rx) => match rx.recv() {
                    Ok(line) => line,
                    // Command source gone: resume rather than deadlock
                    Err(_) => {
                        self.step = StepMode::None;
                        return;
                    }
                },
                None => {
                    self.step = StepMode::None;
                    return;
                }
            };

            let line = line.trim().to_lowercase();
            let mut parts = line.split_whitespace();
            let command = parts.next().unwrap_or("");
            let arg = parts.next();

            match command {
                "continue" | "c" => {
                    self.step = StepMode::None;
                    return;
                }
                "step" | "s" | "step_into" => {
                    self.step = StepMode::Into;
                    return;
                }
                "step_over" | "so" => {
                    self.step = StepMode::Over { depth };
                    return;
                }
                "step_out" | "sout" => {
                    self.step = StepMode::Out {
                        target: depth as i64 - 1,
                    };
                    return;
                }
                "variables" | "vars" | "v" => self.print_variables(env),
                "help" | "h" => self.print_help(),
                "quit" | "q" => std::process::exit(0),
                "addbreak" | "ab" => match arg.and_then(|a| a.parse().ok()) {
                    Some(n) => {
                        self.shared.breakpoints.insert(n);
                        let _ = writeln!(self.out, "Debug: added breakpoint at line {}", n);
                    }
                    None => {
                        let _ = writeln!(self.out, "Usage: addbreak <line_number>");
                    }
                },
                "removebreak" | "rb" => match arg.and_then(|a| a.parse::<u32>().ok()) {
                    Some(n) => {
                        if self.shared.breakpoints.remove(&n).is_some() {
                            let _ =
                                writeln!(self.out, "Debug: removed breakpoint at line {}", n);
                        } else {
                            let _ = writeln!(self.out, "No breakpoint found at line {}", n);
                        }
                    }
                    None => {
                        let _ = writeln!(self.out, "Usage: removebreak <line_number>");
                    }
                },
                "listbreaks" | "lb" => {
                    let _ = writeln!(self.out, "Current breakpoints:");
                    let lines = self.breakpoints();
                    if lines.is_empty() {
                        let _ = writeln!(self.out, "  No breakpoints set");
                    } else {
                        for l in lines {
                            let _ = writeln!(self.out, "  Line {}", l);
                        }
                    }
                }
                "" => {}
                other => {
                    let _ = writeln!(
                        self.out,
                        "Unknown command: {}. Type 'help' for available commands.",
                        other
                    );
                }
            }
        }
    }

    /// Delimited variable/function listing for IDE front ends. Built-ins
    /// and the `true`/`false` constants are excluded.
    fn emit_ide_blocks(&mut self, env: &Environment, builtins: &IndexMap<String, Builtin>) {
        let _ = writeln!(self.out, "DEBUG_VARIABLES_START");
        for (name, value) in env.current_scope_vars() {
            if builtins.contains_key(name) || name == "true" || name == "false" {
                continue;
            }
            let _ = writeln!(self.out, "{}={}", name, value);
        }
        let _ = writeln!(self.out, "DEBUG_VARIABLES_END");

        let _ = writeln!(self.out, "DEBUG_FUNCTIONS_START");
        for name in env.function_names() {
            if builtins.contains_key(name) {
                continue;
            }
            let _ = writeln!(self.out, "{}", name);
        }
        let _ = writeln!(self.out, "DEBUG_FUNCTIONS_END");
    }

    fn print_variables(&mut self, env: &Environment) {
        let _ = writeln!(self.out, "Current variables:");
        let mut any = false;
        for (name, value) in env.current_scope_vars() {
            let _ = writeln!(self.out, "  {} = {}", name, value);
            any = true;
        }
        if !any {
            let _ = writeln!(self.out, "  No variables defined");
        }

        let _ = writeln!(self.out, "Defined functions:");
        let names = env.function_names();
        if names.is_empty() {
            let _ = writeln!(self.out, "  No user-defined functions");
        } else {
            for name in names {
                let _ = writeln!(self.out, "  {}()", name);
            }
        }
    }

    fn print_help(&mut self) {
        let lines = [
            "Debug commands:",
            "  continue (c)       - Continue execution",
            "  step (s)           - Step into next line",
            "  step_over (so)     - Step over function calls",
            "  step_out (sout)    - Step out of current function",
            "  variables (v)      - Show current variables and functions",
            "  addbreak <line>    - Add breakpoint at line number",
            "  removebreak <line> - Remove breakpoint at line number",
            "  listbreaks (lb)    - List all current breakpoints",
            "  help (h)           - Show this help",
            "  quit (q)           - Exit program",
        ];
        for l in lines {
            let _ = writeln!(self.out, "{}", l);
        }
    }
}

/// Listener-thread loop: while the evaluator runs, breakpoint commands
/// mutate the shared state directly; while paused, lines are forwarded to
/// the blocked command loop.
fn listen_stdin(shared: Arc<DebugShared>, tx: Sender<String>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if shared.quit.load(Ordering::SeqCst) {
            break;
        }
        if shared.paused.load(Ordering::SeqCst) {
            if tx.send(line).is_err() {
                break;
            }
        } else {
            handle_runtime_command(&line, &shared);
        }
    }
}

fn handle_runtime_command(line: &str, shared: &DebugShared) {
    let line = line.trim().to_lowercase();
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let arg = parts.next();

    match command {
        "addbreak" | "add_breakpoint" => {
            if let Some(n) = arg.and_then(|a| a.parse().ok()) {
                shared.breakpoints.insert(n);
                println!("Debug: added breakpoint at line {}", n);
            }
        }
        "removebreak" | "remove_breakpoint" => {
            if let Some(n) = arg.and_then(|a| a.parse::<u32>().ok()) {
                shared.breakpoints.remove(&n);
                println!("Debug: removed breakpoint at line {}", n);
            }
        }
        "listbreaks" | "breakpoints" => {
            let mut lines: Vec<u32> = shared.breakpoints.iter().map(|l| *l).collect();
            lines.sort_unstable();
            println!("Active breakpoints: {:?}", lines);
        }
        "quit" | "q" => {
            shared.quit.store(true, Ordering::SeqCst);
            std::process::exit(0);
        }
        // Other commands only make sense while paused
        _ => {}
    }
}
