use csv::Writer;
use nalgebra::{DMatrix, DVector};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs::File;
use std::io::{self, Write};

/// Console logger for binaries and experiments. Repeated calls are fine,
/// only the first initialisation takes effect.
pub fn init_console_logger(level: LevelFilter) {
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

pub fn save_matrix_to_file(
    matrix: &DMatrix<f64>,
    headers: &[String],
    filename: &str,
    x_mesh: &DVector<f64>,
    arg: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    let mut headers_with_x = Vec::new();
    headers_with_x.push(arg.to_string());
    headers_with_x.extend(headers.iter().cloned());
    writeln!(file, "{}", headers_with_x.join("\t"))?;
    for (i, row) in matrix.row_iter().enumerate() {
        let mut row_data = Vec::new();
        row_data.push(x_mesh[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writeln!(file, "{}", row_data.join("\t"))?;
    }

    Ok(())
}

pub fn save_matrix_to_csv(
    matrix: &DMatrix<f64>,
    headers: &[String],
    filename: &str,
    x_mesh: &DVector<f64>,
    arg: &str,
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = Vec::new();
    headers_with_x.push(arg.to_string());
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for (i, row) in matrix.row_iter().enumerate() {
        let mut row_data = Vec::new();
        row_data.push(x_mesh[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_matrix_to_csv_roundtrip_of_shape() {
        let matrix = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x_mesh = DVector::from_vec(vec![0.0, 0.5]);
        let headers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        save_matrix_to_csv(&matrix, &headers, path.to_str().unwrap(), &x_mesh, "t").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "t,a,b,c");
        assert_eq!(lines[1], "0,1,2,3");
    }

    #[test]
    fn test_save_matrix_to_file_tab_separated() {
        let matrix = DMatrix::from_row_slice(1, 2, &[1.5, -2.0]);
        let x_mesh = DVector::from_vec(vec![0.25]);
        let headers = vec!["u".to_string(), "v".to_string()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.txt");
        save_matrix_to_file(&matrix, &headers, path.to_str().unwrap(), &x_mesh, "t").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "t\tu\tv\n0.25\t1.5\t-2\n");
    }
}
