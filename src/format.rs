//! Text grid files and command output
//!
//! A grid file has one line per instrument. Cells are `x` (on) or `.` (off);
//! spaces and `|` are only visual separators. A line may start with an
//! instrument label and a colon to pick its row, otherwise rows are filled
//! in order. `#` starts a comment.
//!
//! ```text
//! # basic rock beat
//! bd: x... x...
//! sd: ..x. ..x.
//! hh: x.x. x.x.
//! ```

use anyhow::{Context, Result};
use drumgrid_core::{DrumKit, Grid, ImportedPattern, RhythmVector, SearchResult};

pub fn parse_grid(text: &str, kit: &DrumKit) -> Result<Grid> {
    let mut rows: Vec<Option<Vec<bool>>> = vec![None; kit.len()];
    let mut steps: Option<usize> = None;
    let mut next_row = 0;

    for (line_idx, raw) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (label, cells_text) = match line.split_once(':') {
            Some((label, cells)) => (Some(label.trim()), cells),
            None => (None, line),
        };

        let row = match label {
            Some(label) => kit
                .index_of(label)
                .with_context(|| format!("line {}: unknown instrument '{}'", line_no, label))?,
            None => next_row,
        };
        if row >= kit.len() {
            anyhow::bail!("line {}: more rows than the kit's {} instruments", line_no, kit.len());
        }
        if rows[row].is_some() {
            anyhow::bail!("line {}: row for {} given twice", line_no, instrument_name(kit, row));
        }

        let cells = parse_cells(cells_text).with_context(|| format!("line {}", line_no))?;
        match steps {
            Some(expected) if expected != cells.len() => {
                anyhow::bail!(
                    "line {}: {} steps, earlier rows have {}",
                    line_no,
                    cells.len(),
                    expected
                );
            }
            _ => steps = Some(cells.len()),
        }

        rows[row] = Some(cells);
        next_row = row + 1;
    }

    let steps = steps.context("grid file has no rows")?;
    let rows = rows
        .into_iter()
        .map(|row| row.unwrap_or_else(|| vec![false; steps]))
        .collect();
    Ok(Grid::from_rows_with_steps(rows, steps)?)
}

fn parse_cells(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '|')
        .map(|c| match c {
            'x' | 'X' | '1' => Ok(true),
            '.' | '-' | '0' => Ok(false),
            other => Err(anyhow::anyhow!("unexpected cell character '{}'", other)),
        })
        .collect()
}

fn instrument_name(kit: &DrumKit, row: usize) -> String {
    kit.get(row)
        .map(|inst| inst.name.clone())
        .unwrap_or_else(|| format!("row {}", row))
}

/// Render a grid in the format [`parse_grid`] reads, cells grouped by beat
pub fn render_grid(grid: &Grid, kit: &DrumKit) -> String {
    let labels: Vec<String> = (0..grid.instruments())
        .map(|row| {
            kit.get(row)
                .map(|inst| inst.short.clone())
                .unwrap_or_else(|| format!("r{}", row))
        })
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);

    grid.rows()
        .iter()
        .zip(&labels)
        .map(|(row, label)| {
            let cells = row
                .chunks(4)
                .map(|beat| beat.iter().map(|&on| if on { 'x' } else { '.' }).collect::<String>())
                .collect::<Vec<_>>()
                .join(" ");
            format!("{:>width$}: {}", label, cells, width = width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_vector(vector: &RhythmVector) -> String {
    let values = vector
        .as_slice()
        .iter()
        .map(|v| format!("{:.3}", v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", values)
}

/// Renders command results as text or JSON
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn import_report(&self, pattern: &ImportedPattern, kit: &DrumKit) -> Result<String> {
        if self.json {
            #[derive(serde::Serialize)]
            struct JsonOutput<'a> {
                bpm: f64,
                steps: usize,
                grid: &'a Grid,
                vector: &'a RhythmVector,
            }

            let output = JsonOutput {
                bpm: pattern.bpm,
                steps: pattern.grid.steps(),
                grid: &pattern.grid,
                vector: &pattern.vector,
            };
            return serde_json::to_string_pretty(&output).context("Failed to serialize import");
        }

        Ok(format!(
            "bpm: {}\nsteps: {}\n{}\nvector: {}",
            format_bpm(pattern.bpm),
            pattern.grid.steps(),
            render_grid(&pattern.grid, kit),
            format_vector(&pattern.vector)
        ))
    }

    pub fn vector_report(&self, vector: &RhythmVector) -> Result<String> {
        if self.json {
            return serde_json::to_string(vector).context("Failed to serialize vector");
        }
        Ok(format_vector(vector))
    }

    pub fn search_report(&self, results: &[SearchResult]) -> Result<String> {
        if self.json {
            return serde_json::to_string_pretty(results).context("Failed to serialize results");
        }
        if results.is_empty() {
            return Ok("no matches".to_string());
        }

        Ok(results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let distance = r
                    .distance
                    .map_or_else(|| "-".to_string(), |d| format!("{:.4}", d));
                match &r.id {
                    Some(id) => format!(
                        "{:>2}. {}  distance {}  id {}",
                        i + 1,
                        r.filename,
                        distance,
                        id
                    ),
                    None => format!("{:>2}. {}  distance {}", i + 1, r.filename, distance),
                }
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn format_bpm(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{}", bpm)
    } else {
        format!("{:.2}", bpm)
    }
}
