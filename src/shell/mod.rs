use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::commands::quantum::render_event;
use crate::config::SimConfig;
use crate::core::quantum_extract::circuit_to_listing;
use crate::core::quantum_ir::{parse_shots, Event, Interpreter};
use crate::core::titan::session::Session;
use crate::core::titan::snapshot::StateSnapshot;

/// Amplitudes below this magnitude are hidden by `state`.
const SHOW_EPS: f64 = 1e-12;

pub fn start(cfg: SimConfig) -> anyhow::Result<()> {
    banner();

    let mut interp = Interpreter::new(cfg.run_settings());
    loop {
        let width = interp.session().map(|s| s.num_qubits()).unwrap_or(0);
        print!(
            "{} {} {} ",
            "⟦TITAN⟧".bold().truecolor(0, 255, 180),
            format!("{width}q").truecolor(130, 0, 200),
            "›".truecolor(255, 240, 0)
        );
        io::stdout().flush().ok();

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = shell_words(line);
        if parts.is_empty() {
            continue;
        }
        let cmd = parts.remove(0).to_ascii_lowercase();

        match cmd.as_str() {
            "help" | "?" => print_help(),
            "exit" | "quit" => break,

            "state" => with_session(&mut interp, |s| {
                print_state(s);
                Ok(())
            }),
            "history" => with_session(&mut interp, |s| {
                for (i, g) in s.history().iter().enumerate() {
                    println!("{:>4}  {} t={:?} c={:?}", i, g.kind().name(), g.targets(), g.controls());
                }
                Ok(())
            }),
            "listing" => with_session(&mut interp, |s| {
                print!("{}", circuit_to_listing(s.num_qubits(), s.history()));
                Ok(())
            }),
            "sample" => {
                // sample <targets> [shots]
                if parts.is_empty() || parts.len() > 2 {
                    usage("sample <targets> [shots]");
                    continue;
                }
                let shots = match parts.get(1).map(|t| parse_shots(t)) {
                    None => cfg.shots,
                    Some(Ok(n)) => n,
                    Some(Err(e)) => {
                        eprintln!("{} {e:#}", "err:".red().bold());
                        continue;
                    }
                };
                let targets = parts[0].clone();
                with_session(&mut interp, |s| {
                    let qubits = targets
                        .split(',')
                        .filter(|t| !t.is_empty())
                        .map(|t| s.resolve(t))
                        .collect::<Result<Vec<_>, _>>()?;
                    let result = s.sample(&qubits, shots)?;
                    if let Some(text) = render_event(&Event::Sampled(result)) {
                        println!("{text}");
                    }
                    Ok(())
                })
            }
            "reset" => with_session(&mut interp, |s| {
                s.reset();
                println!("{}", "register reset to |0…0⟩".dimmed());
                Ok(())
            }),
            "save" => {
                let Some(path) = parts.first().map(PathBuf::from) else {
                    usage("save <file.json>");
                    continue;
                };
                with_session(&mut interp, |s| {
                    s.snapshot().save(&path)?;
                    println!("{} {}", "saved".green(), path.display());
                    Ok(())
                })
            }
            "load" => {
                let Some(path) = parts.first().map(PathBuf::from) else {
                    usage("load <file.json>");
                    continue;
                };
                with_session(&mut interp, |s| {
                    let text = std::fs::read_to_string(&path)?;
                    s.restore(&StateSnapshot::from_json(&text)?)?;
                    println!("{} {}", "loaded".green(), path.display());
                    Ok(())
                })
            }

            // Everything else is a script instruction (CREATE, GATE, NOISE, MEASURE, METRICS).
            _ => match interp.run_line(line) {
                Ok(Some(event)) => {
                    if let Some(text) = render_event(&event) {
                        println!("{text}");
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{} {e:#}", "err:".red().bold()),
            },
        }
    }

    Ok(())
}

fn with_session<F>(interp: &mut Interpreter, f: F)
where
    F: FnOnce(&mut Session) -> anyhow::Result<()>,
{
    match interp.session_mut() {
        Some(s) => {
            if let Err(e) = f(s) {
                eprintln!("{} {e:#}", "err:".red().bold());
            }
        }
        None => eprintln!("{} no register yet: start with CREATE <n>", "err:".red().bold()),
    }
}

fn print_state(s: &Session) {
    let state = s.state();
    for (i, a) in state.amplitudes().iter().enumerate() {
        if a.norm() < SHOW_EPS {
            continue;
        }
        println!(
            "  |{}⟩  {:>+.6}{:>+.6}i  p={:.6}",
            state.basis_label(i).truecolor(255, 180, 0),
            a.re,
            a.im,
            a.norm_sqr()
        );
    }
    if !s.names().is_empty() {
        let labels: Vec<String> = s.names().iter().map(|(n, i)| format!("{n}={i}")).collect();
        println!("  {}", labels.join(" ").dimmed());
    }
}

fn banner() {
    println!(
        "\n{}  \n{}  \n",
        "╔══════════════════════════════════════════════════╗".truecolor(0, 255, 180),
        "║            T i t a n   q u a n t u m            ║"
            .truecolor(255, 240, 0)
            .bold(),
    );
    println!(
        "{}  {}",
        "╚══════════════════════════════════════════════════╝".truecolor(0, 255, 180),
        "type 'help' for commands".truecolor(130, 0, 200)
    );
}

fn print_help() {
    println!(
        "{}\n\
         {}\n  CREATE <n> [name ...]                    # fresh register |0…0⟩\n  GATE <kind> <targets> [controls] [angle]  # x y z h s t rx ry rz cnot cz swap toffoli\n  NOISE <kind> <prob> <targets>            # depolarizing amplitude_damping phase_damping\n  MEASURE <targets> [shots]                # collapse, or sample with shots\n  METRICS                                  # purity, coherence, fidelity, entanglement\n\
         {}\n  state               # amplitudes and probabilities\n  history             # gates applied so far\n  listing             # history as a gate listing\n  sample <targets> [shots]  # sample without collapsing\n  reset               # back to |0…0⟩\n\
         {}\n  save <file.json>    # write a state snapshot\n  load <file.json>    # restore a snapshot of the same size\n\
         {}\n  help                # show this help\n  exit                # quit shell\n",
        "Titan — Quantum Circuit Shell".bold().truecolor(0, 255, 180),
        "Instructions:".truecolor(255, 180, 0),
        "Inspect:".truecolor(130, 0, 200),
        "Files:".truecolor(130, 0, 200),
        "Help:".truecolor(130, 0, 200),
    );
}

fn usage(s: &str) {
    eprintln!("{} {}", "usage:".yellow().bold(), s);
}

fn shell_words(s: &str) -> Vec<String> {
    // minimal split by whitespace respecting "quoted strings"
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_q = false;
    for c in s.chars() {
        match (c, in_q) {
            ('"', false) => in_q = true,
            ('"', true) => in_q = false,
            (c, _) if c.is_whitespace() && !in_q => {
                if !buf.is_empty() {
                    out.push(std::mem::take(&mut buf));
                }
            }
            (c, _) => buf.push(c),
        }
    }
    if !buf.is_empty() {
        out.push(buf);
    }
    out
}
