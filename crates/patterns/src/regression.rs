use common::TrendLine;

/// OLS fit of price over bar index, with R² goodness of fit.
///
/// Fewer than two points yields a flat line through the first point (or zero)
/// with R² = 0.
pub fn linear_regression(points: &[(f64, f64)]) -> TrendLine {
    let n = points.len();
    if n < 2 {
        return TrendLine {
            slope: 0.0,
            intercept: points.first().map(|p| p.1).unwrap_or(0.0),
            r_squared: 0.0,
        };
    }

    let n_f = n as f64;
    let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n_f;
    let y_mean = points.iter().map(|p| p.1).sum::<f64>() / n_f;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for &(x, y) in points {
        sxy += (x - x_mean) * (y - y_mean);
        sxx += (x - x_mean) * (x - x_mean);
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for &(x, y) in points {
        let fitted = slope * x + intercept;
        ss_res += (y - fitted) * (y - fitted);
        ss_tot += (y - y_mean) * (y - y_mean);
    }

    // A perfectly flat series is a perfect fit of its own mean
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    TrendLine {
        slope,
        intercept,
        r_squared,
    }
}

/// Fit over the highs of index-tagged candles.
pub fn fit_highs(candles: &[common::Candle]) -> TrendLine {
    let points: Vec<(f64, f64)> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, c.high))
        .collect();
    linear_regression(&points)
}

/// Fit over the lows of index-tagged candles.
pub fn fit_lows(candles: &[common::Candle]) -> TrendLine {
    let points: Vec<(f64, f64)> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, c.low))
        .collect();
    linear_regression(&points)
}
