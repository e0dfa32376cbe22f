/*!
 * Device Module
 * Session context shared by the resources of one device
 */

pub mod session;

pub use session::{DeviceHandle, DeviceSession, DeviceSessionBuilder};
