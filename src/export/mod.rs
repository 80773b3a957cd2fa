// src/export/mod.rs
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::acquisition::window::SampleWindow;
use crate::acquisition::{Sample, SensorStatus};
use crate::error::Result;

pub const CSV_HEADER: [&str; 3] = ["Tempo (s)", "ADC", "Status"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Tempo (s)")]
    t: f64,
    #[serde(rename = "ADC")]
    adc: i64,
    #[serde(rename = "Status")]
    status: SensorStatus,
}

pub fn write_samples<'a, W, I>(writer: W, samples: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Sample>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for sample in samples {
        wtr.write_record(&[
            sample.t.to_string(),
            sample.adc.to_string(),
            sample.status.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn read_samples<R: Read>(reader: R) -> Result<Vec<Sample>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut samples = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvRow = result?;
        samples.push(Sample {
            t: row.t,
            adc: row.adc,
            status: row.status,
        });
    }

    Ok(samples)
}

/// Overwrites `path` with the current window contents.
pub fn save_csv<P: AsRef<Path>>(path: P, window: &SampleWindow) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_samples(file, window.iter())?;
    log::info!(
        "Saved {} samples to {}",
        window.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    read_samples(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_are_written_in_order() {
        let samples = vec![
            Sample {
                t: 0.0,
                adc: 65535,
                status: SensorStatus::Clear,
            },
            Sample {
                t: 0.2003,
                adc: 2950,
                status: SensorStatus::Obstructed,
            },
        ];

        let mut out = Vec::new();
        write_samples(&mut out, &samples).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Tempo (s),ADC,Status\n0,65535,CLEAR\n0.2003,2950,OBSTRUCTED\n"
        );
    }

    #[test]
    fn empty_window_writes_only_the_header() {
        let mut out = Vec::new();
        write_samples(&mut out, SampleWindow::default().iter()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Tempo (s),ADC,Status\n");
    }

    #[test]
    fn reads_back_what_was_written() {
        let mut window = SampleWindow::new(30.0);
        window.push(Sample {
            t: 1.25,
            adc: 100,
            status: SensorStatus::Other("FAULT".to_string()),
        });
        window.push(Sample {
            t: 2.5,
            adc: -4,
            status: SensorStatus::Obstructed,
        });

        let mut out = Vec::new();
        write_samples(&mut out, window.iter()).unwrap();

        assert_eq!(read_samples(out.as_slice()).unwrap(), window.to_vec());
    }

    #[test]
    fn rejects_a_non_numeric_adc_column() {
        let data = "Tempo (s),ADC,Status\n0.5,high,CLEAR\n";
        assert!(read_samples(data.as_bytes()).is_err());
    }
}
