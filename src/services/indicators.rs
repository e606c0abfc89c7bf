/// Simple Moving Average over the trailing `window` values.
///
/// Returns `None` until `window` values exist.
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Relative Strength Index of the latest close, Wilder smoothing.
///
/// RSI values range from 0 to 100:
/// - Below 30: oversold
/// - Above 70: overbought
///
/// Needs `period + 1` closes; returns `None` otherwise.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (seed_gain, seed_loss) = changes[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), &c| if c > 0.0 { (g + c, l) } else { (g, l - c) });

    let p = period as f64;
    let (avg_gain, avg_loss) = changes[period..].iter().fold(
        (seed_gain / p, seed_loss / p),
        |(g, l), &c| {
            let (gain, loss) = if c > 0.0 { (c, 0.0) } else { (0.0, -c) };
            ((g * (p - 1.0) + gain) / p, (l * (p - 1.0) + loss) / p)
        },
    );

    if avg_loss == 0.0 {
        return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Percent change between the close `lookback` bars ago and the latest close.
pub fn percent_change(closes: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || closes.len() <= lookback {
        return None;
    }

    let latest = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - lookback];
    if base == 0.0 {
        return None;
    }

    Some((latest - base) / base * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_window() {
        assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
        assert_eq!(sma(&[1.0], 2), None);
        assert_eq!(sma(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn test_rsi_bounds() {
        let prices = vec![44.0, 44.5, 44.0, 45.0, 44.5, 45.5, 45.0, 46.0, 46.5, 46.0,
                          47.0, 46.5, 47.5, 47.0, 48.0, 48.5];
        let value = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&value));
        assert!(rsi(&prices[..14], 14).is_none());
    }

    #[test]
    fn test_rsi_trends() {
        let uptrend: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        assert_eq!(rsi(&uptrend, 14), Some(100.0));

        let downtrend: Vec<f64> = (0..30).map(|i| 80.0 - i as f64).collect();
        assert!(rsi(&downtrend, 14).unwrap() < 30.0, "Strong downtrend should show oversold RSI");

        let flat = vec![10.0; 20];
        assert_eq!(rsi(&flat, 14), Some(50.0));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(&[100.0, 90.0, 110.0], 2), Some(10.0));
        assert_eq!(percent_change(&[200.0, 150.0], 1), Some(-25.0));
        assert_eq!(percent_change(&[100.0], 1), None);
    }
}
