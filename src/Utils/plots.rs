use nalgebra::{DMatrix, DVector};

/// All state components on one chart against the time variable.
///
/// Discretised systems carry one state per mesh node, so the legend is only
/// drawn when the component count is small enough to read.
pub fn plots(arg: &str, values: &[String], t_result: &DVector<f64>, y_result: &DMatrix<f64>) {
    use plotters::prelude::*;
    let x_min = t_result.min();
    let x_max = t_result.max();
    let y_min = y_result.min();
    let y_max = y_result.max();
    let span = (y_max - y_min).max(1e-12);
    let filename = format!("{}_series.png", arg);
    let root_area = BitMapBackend::new(&filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root_area)
        .caption(format!("state against {}", arg), ("sans-serif", 50))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(
            x_min..x_max,
            (y_min - 0.05 * span)..(y_max + 0.05 * span),
        )
        .unwrap();

    chart.configure_mesh().x_desc(arg).draw().unwrap();

    let with_legend = values.len() <= 8;
    for col in 0..y_result.ncols() {
        let series: Vec<(f64, f64)> = t_result
            .iter()
            .zip(y_result.column(col).iter())
            .map(|(&x, &y)| (x, y))
            .collect();
        let drawn = chart
            .draw_series(LineSeries::new(series, &Palette99::pick(col)))
            .unwrap();
        if with_legend {
            drawn.label(format!(" {}", values[col])).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], &Palette99::pick(col))
            });
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .unwrap();
    }
}

/// Spatial profile of one field at a fixed time: value against node position.
pub fn plot_profile(varname: &str, nodes: &DVector<f64>, values: &DVector<f64>) {
    use plotters::prelude::*;
    let x_min = nodes.min();
    let x_max = nodes.max();
    let y_min = values.min();
    let y_max = values.max();
    let span = (y_max - y_min).max(1e-12);
    let filename = format!("{}_profile.png", varname);
    let root_area = BitMapBackend::new(&filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root_area)
        .caption(format!("{} profile", varname), ("sans-serif", 50))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(
            x_min..x_max,
            (y_min - 0.05 * span)..(y_max + 0.05 * span),
        )
        .unwrap();

    chart
        .configure_mesh()
        .x_desc("r")
        .y_desc(varname)
        .draw()
        .unwrap();

    let series: Vec<(f64, f64)> = nodes
        .iter()
        .zip(values.iter())
        .map(|(&x, &y)| (x, y))
        .collect();
    chart
        .draw_series(LineSeries::new(series.clone(), &BLUE))
        .unwrap();
    chart
        .draw_series(series.iter().map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())))
        .unwrap();
}
