//! Compute device selection for the embedding model.

use candle_core::Device;

/// Pick the device the model runs on: Metal when the `metal` feature
/// is enabled and a device can be initialized, CPU otherwise. The
/// embedder moves pooled vectors back to CPU before returning them, so
/// callers never see the device choice.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            println!("🚀 Device: Metal (MPS)");
            return dev;
        }
    }
    println!("🖥️  Device: CPU");
    Device::Cpu
}
