use candle_core::Device;
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceKind {
    Cpu,
    Cuda,
    Metal,
}

/// Resolves the requested device, falling back to CPU when the backend
/// is not compiled in or not present.
pub fn get_device(kind: DeviceKind, ordinal: usize) -> Device {
    match kind {
        DeviceKind::Cpu => {}
        DeviceKind::Cuda => {
            #[cfg(feature = "cuda")]
            if let Ok(device) = Device::cuda_if_available(ordinal) {
                if device.is_cuda() {
                    log::info!("Using CUDA device {}", ordinal);
                    return device;
                }
            }
            log::warn!("CUDA device {} unavailable, falling back to CPU", ordinal);
        }
        DeviceKind::Metal => {
            #[cfg(feature = "metal")]
            if let Ok(device) = Device::new_metal(ordinal) {
                if device.is_metal() {
                    log::info!("Using Metal device {}", ordinal);
                    return device;
                }
            }
            log::warn!("Metal device {} unavailable, falling back to CPU", ordinal);
        }
    }

    log::info!("Using CPU device");
    Device::Cpu
}
