use std::env;
use std::path::PathBuf;

use csv::{ReaderBuilder, WriterBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 4 {
        eprintln!("Usage: {} <input.csv> <output.csv> <sample_percentage>", args[0]);
        eprintln!("Example: sample_plots wiki_movie_plots.csv sample.csv 10");
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let output_path = PathBuf::from(&args[2]);
    let sample_percentage: f32 = args[3].parse()
        .map_err(|_| "Sample percentage must be a number")?;

    if sample_percentage <= 0.0 || sample_percentage > 100.0 {
        eprintln!("Sample percentage must be between 0 and 100");
        std::process::exit(1);
    }

    println!("Sampling {}% of rows from {} to {}",
             sample_percentage, input_path.display(), output_path.display());

    let total_rows = ReaderBuilder::new().from_path(&input_path)?.records().count();
    println!("Total rows in source: {}", total_rows);

    let sample_size = ((total_rows as f32) * (sample_percentage / 100.0)) as usize;
    let step = if sample_size > 0 { total_rows / sample_size } else { 1 };
    let step = step.max(1);
    println!("Taking every {}th row", step);

    let mut reader = ReaderBuilder::new().from_path(&input_path)?;
    let mut writer = WriterBuilder::new().from_path(&output_path)?;
    writer.write_record(reader.headers()?)?;

    let mut sampled_count = 0;
    for (i, record) in reader.records().enumerate() {
        if i % step == 0 {
            writer.write_record(&record?)?;
            sampled_count += 1;
        }
    }
    writer.flush()?;

    println!("✅ Wrote {} rows to {}", sampled_count, output_path.display());
    Ok(())
}
