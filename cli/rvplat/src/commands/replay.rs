//! `rvplat replay`: drive the platform boundary from an LR/SC trace script.
//!
//! A script is one command per line; `#` outside a quoted char starts a
//! comment:
//!
//! ```text
//! hart 1          # following commands target hart 1
//! lr 0x80001000   # load-reserved
//! match 0x80001000
//! sc 0x80001000   # store-conditional (releases the reservation)
//! cancel          # drop the reservation
//! trap            # a trap was taken
//! putc 0x41       # console byte (low 8 bits), or a quoted char: putc 'A'
//! tick            # query the instructions-per-tick hook
//! extend 4096 0   # memory-extension notification: length, tag
//! ```

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use rvplat_hart::{ConsoleSink, HartId, HartSet, MachWord, PlatformConfig};

/// One parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Hart(usize),
    Lr(MachWord),
    Sc(MachWord),
    Match(MachWord),
    Cancel,
    Trap,
    Putc(MachWord),
    Tick,
    Extend(MachWord, i64),
}

/// Parse a whole script, reporting the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let step = tokenize(raw)
            .and_then(|tokens| match tokens.split_first() {
                Some((command, args)) => parse_line(command, args).map(Some),
                None => Ok(None),
            })
            .with_context(|| format!("line {}: '{}'", index + 1, raw.trim()))?;
        steps.extend(step);
    }
    Ok(steps)
}

/// Split a line into words, keeping quoted chars such as `' '` and `'#'`
/// whole and dropping everything from an unquoted `#`.
fn tokenize(line: &str) -> Result<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while let Some(first) = rest.chars().next() {
        let len = match first {
            '#' => break,
            '\'' => match rest.char_indices().skip(2).find(|&(_, c)| c == '\'') {
                Some((close, _)) => close + 1,
                None => bail!("unterminated quote in {rest}"),
            },
            _ => rest
                .find(|c: char| c.is_whitespace() || c == '#')
                .unwrap_or(rest.len()),
        };
        tokens.push(&rest[..len]);
        rest = rest[len..].trim_start();
    }
    Ok(tokens)
}

fn parse_line(command: &str, args: &[&str]) -> Result<Step> {
    let expect = |n: usize| -> Result<()> {
        if args.len() == n {
            Ok(())
        } else {
            bail!("'{command}' takes {n} argument(s), got {}", args.len())
        }
    };

    let step = match command {
        "hart" => {
            expect(1)?;
            Step::Hart(usize::try_from(parse_word(args[0])?)?)
        }
        "lr" => {
            expect(1)?;
            Step::Lr(parse_word(args[0])?)
        }
        "sc" => {
            expect(1)?;
            Step::Sc(parse_word(args[0])?)
        }
        "match" => {
            expect(1)?;
            Step::Match(parse_word(args[0])?)
        }
        "cancel" => {
            expect(0)?;
            Step::Cancel
        }
        "trap" => {
            expect(0)?;
            Step::Trap
        }
        "putc" => {
            expect(1)?;
            Step::Putc(parse_char_or_word(args[0])?)
        }
        "tick" => {
            expect(0)?;
            Step::Tick
        }
        "extend" => {
            expect(2)?;
            let tag = args[1]
                .parse::<i64>()
                .with_context(|| format!("invalid tag '{}'", args[1]))?;
            Step::Extend(parse_word(args[0])?, tag)
        }
        other => bail!("unknown command '{other}'"),
    };
    Ok(step)
}

fn parse_word(s: &str) -> Result<MachWord> {
    let cleaned = s.replace('_', "");
    let parsed = match cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        Some(hex) => MachWord::from_str_radix(hex, 16),
        None => cleaned.parse::<MachWord>(),
    };
    parsed.with_context(|| format!("invalid number '{s}'"))
}

fn parse_char_or_word(s: &str) -> Result<MachWord> {
    if let Some(inner) = s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        let mut chars = inner.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(MachWord::from(c as u8)),
            _ => Err(anyhow!("expected a single ASCII character in {s}")),
        };
    }
    parse_word(s)
}

/// Run `steps` against a fresh hart set, writing one line per observable
/// result to `out`.
pub fn execute<C: ConsoleSink>(
    steps: &[Step],
    harts: &mut HartSet<C>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut current = HartId(0);
    for step in steps {
        if let Step::Hart(id) = *step {
            if id >= harts.len() {
                bail!("hart {id} does not exist ({} hart(s) configured)", harts.len());
            }
            current = HartId(id);
            continue;
        }
        let hart = harts
            .hart_mut(current)
            .ok_or_else(|| anyhow!("no harts configured"))?;
        match *step {
            Step::Hart(_) => {}
            Step::Lr(addr) => hart.load_reservation(addr),
            Step::Sc(addr) => {
                let outcome = hart.store_conditional(addr);
                writeln!(
                    out,
                    "{current} sc 0x{addr:x} -> {} (rd={})",
                    if outcome.is_success() { "success" } else { "failure" },
                    outcome.rd_value()
                )?;
            }
            Step::Match(addr) => {
                let hit = hart.speculate_conditional() && hart.match_reservation(addr);
                writeln!(out, "{current} match 0x{addr:x} -> {hit}")?;
            }
            Step::Cancel => hart.cancel_reservation(),
            Step::Trap => hart.on_trap(),
            Step::Putc(word) => hart.term_write(word),
            Step::Tick => match hart.insns_per_tick() {
                Some(n) => writeln!(out, "{current} insns-per-tick -> {n}")?,
                None => writeln!(out, "{current} insns-per-tick -> unbounded")?,
            },
            Step::Extend(len, tag) => hart.notify_memory_extension(len, tag),
        }
    }
    Ok(())
}

/// Entry point for `rvplat replay`.
pub fn run<C: ConsoleSink>(
    script: &str,
    platform: PlatformConfig,
    hart_count: usize,
    make_console: impl FnMut(HartId) -> C,
    out: &mut dyn Write,
) -> Result<HartSet<C>> {
    if hart_count == 0 {
        bail!("at least one hart is required");
    }
    let steps = parse_script(script)?;
    tracing::info!(platform = platform.name(), harts = hart_count, steps = steps.len(), "replaying script");
    let mut harts = HartSet::new(Arc::new(platform), hart_count, make_console);
    execute(&steps, &mut harts, out)?;
    Ok(harts)
}
