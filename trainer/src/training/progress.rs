use indicatif::{ProgressBar, ProgressStyle};

use crate::error::TrainError;

pub struct TrainingProgressBar {
    bar: ProgressBar,
}

impl TrainingProgressBar {
    pub fn new(num_batches: usize, epoch: usize) -> Result<Self, TrainError> {
        let bar = ProgressBar::new(num_batches as u64);
        bar.set_style(ProgressStyle::default_bar().template(
            "{prefix} {spinner:.cyan} {pos}/{len} [{wide_bar:.cyan/blue}] {eta_precise} | {msg}",
        )?);
        bar.set_prefix(format!("epoch {:>3}", epoch));
        Ok(Self { bar })
    }

    pub fn update(&self, loss: f32) {
        self.bar.set_message(format!("loss: {:.5}", loss));
        self.bar.inc(1);
    }

    pub fn finish(&self, metric_name: &str, metric: f64, train_loss: f32) {
        self.bar.set_message(format!(
            "{}: {:.5}, loss: {:.5}",
            metric_name, metric, train_loss
        ));
        self.bar.finish();
    }
}
