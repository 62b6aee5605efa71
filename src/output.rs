// src/output.rs - Thermodynamic result files and lattice snapshot files
//
// Both are plain space-separated text:
//   results   "# Temperature Energy Magnetization HeatCapacity" then "T E M C"
//   snapshots one "x y spin01" line per site, x = column, y = row

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::lattice::Lattice;
use crate::simulation::{ResultRecord, RunObserver, SnapshotRecord};

/// First line of every result file. Written as a raw comment line; the data
/// rows below it have four fields.
pub const RESULT_HEADER: &str = "# Temperature Energy Magnetization HeatCapacity";

/// `thermodynamic_results_T2.000000_B0.000000.txt`
pub fn results_file_name(temperature: f64, field: f64) -> String {
    format!("thermodynamic_results_T{temperature:.6}_B{field:.6}.txt")
}

/// `T2.30`
pub fn snapshot_dir_name(temperature: f64) -> String {
    format!("T{temperature:.2}")
}

/// `lattice_step100.txt`
pub fn snapshot_file_name(sweep: usize) -> String {
    format!("lattice_step{sweep}.txt")
}

fn space_writer<W: Write>(inner: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn space_reader<R: std::io::Read>(inner: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(inner)
}

/// Writes the header once, then one line per result, 6 decimals each.
pub struct ResultWriter<W: Write> {
    wtr: csv::Writer<W>,
    target: PathBuf,
}

impl ResultWriter<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        Self::with_target(file, path.to_path_buf())
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        Self::with_target(inner, PathBuf::from("<results>"))
    }

    fn with_target(mut inner: W, target: PathBuf) -> Result<Self> {
        writeln!(inner, "{RESULT_HEADER}").map_err(|e| Error::io(&target, e))?;
        Ok(Self { wtr: space_writer(inner), target })
    }

    pub fn write(&mut self, record: &ResultRecord) -> Result<()> {
        self.wtr.write_record(&[
            format!("{:.6}", record.temperature),
            format!("{:.6}", record.energy),
            format!("{:.6}", record.magnetization),
            format!("{:.6}", record.heat_capacity),
        ])?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        let target = self.target;
        self.wtr.into_inner().map_err(|e| {
            let err = e.error();
            Error::io(target, std::io::Error::new(err.kind(), err.to_string()))
        })
    }
}

fn write_all<W: Write>(mut writer: ResultWriter<W>, records: &[ResultRecord]) -> Result<W> {
    for r in records {
        writer.write(r)?;
    }
    writer.finish()
}

/// Write `records` to a fresh result file at `path`. On a write error the
/// partial file is removed.
pub fn write_results(path: impl AsRef<Path>, records: &[ResultRecord]) -> Result<()> {
    let path = path.as_ref();
    let writer = ResultWriter::create(path)?;
    if let Err(e) = write_all(writer, records) {
        if let Err(rm) = fs::remove_file(path) {
            warn!("could not remove partial result file {}: {rm}", path.display());
        }
        return Err(e);
    }
    Ok(())
}

/// Parse a result file; the header comment is skipped.
pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<ResultRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut rdr = space_reader(file);

    let mut out = Vec::new();
    for row in rdr.deserialize::<(f64, f64, f64, f64)>() {
        let (temperature, energy, magnetization, heat_capacity) = row?;
        out.push(ResultRecord { temperature, energy, magnetization, heat_capacity });
    }
    Ok(out)
}

/// Writes each snapshot to `<dir>/lattice_step<t>.txt`.
#[derive(Debug)]
pub struct SnapshotWriter {
    dir: PathBuf,
    written: usize,
}

impl SnapshotWriter {
    /// Creates `dir` (and parents) if missing.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        Ok(Self { dir, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshots written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, snapshot: &SnapshotRecord) -> Result<PathBuf> {
        let path = self.dir.join(snapshot_file_name(snapshot.sweep()));
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut wtr = space_writer(file);
        for y in 0..snapshot.size() {
            for x in 0..snapshot.size() {
                wtr.serialize((x, y, snapshot.spin01(y, x)))?;
            }
        }
        wtr.flush().map_err(|e| Error::io(&path, e))?;
        self.written += 1;
        debug!("wrote {}", path.display());
        Ok(path)
    }
}

impl RunObserver for SnapshotWriter {
    fn on_snapshot(&mut self, snapshot: SnapshotRecord) -> Result<()> {
        self.write(&snapshot).map(|_| ())
    }
}

/// Rebuild a lattice from a snapshot file. The side length is taken from the
/// largest `x` coordinate; every site must appear exactly once.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Lattice> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut rdr = space_reader(file);

    let malformed = |line: usize| Error::MalformedSnapshot { path: path.to_path_buf(), line };

    let mut sites = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line() as usize);
        let (x, y, s): (usize, usize, u8) = row.deserialize(None)?;
        if s > 1 {
            return Err(malformed(line));
        }
        sites.push((x, y, s, line));
    }

    let size = sites.iter().map(|&(x, ..)| x + 1).max().unwrap_or(0);
    if size == 0 || sites.len() != size * size {
        return Err(malformed(sites.len() + 1));
    }

    let mut spins = vec![0i8; size * size];
    for (x, y, s, line) in sites {
        if y >= size || spins[y * size + x] != 0 {
            return Err(malformed(line));
        }
        spins[y * size + x] = if s == 1 { 1 } else { -1 };
    }

    Lattice::from_spins(size, spins).ok_or_else(|| malformed(0))
}
