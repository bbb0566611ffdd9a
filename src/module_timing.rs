//! Fixed settle times of the A6 firmware.
//!
//! Several commands answer `OK` before the module has actually finished
//! acting on them, so the driver pauses for these before issuing the next one.

use embassy_time::Duration;

/// Gap between probes of the synchronization burst
pub fn sync_burst_gap() -> Duration {
    Duration::from_millis(40)
}

/// Pause before every probe of a synchronization cycle
pub fn sync_probe_gap() -> Duration {
    Duration::from_millis(50)
}

/// Time the modem needs to answer a resynchronization `AT` after a soft error
pub fn resync_time() -> Duration {
    Duration::from_millis(100)
}

/// Wait between `+CREG?` polls while the registration is still settling
pub fn registration_settle_time() -> Duration {
    Duration::from_millis(1000)
}

/// Pause after reading a stored message before the next storage access
pub fn sms_read_settle_time() -> Duration {
    Duration::from_millis(500)
}

/// Time the modem needs to switch in and out of the SMS text prompt
pub fn sms_prompt_time() -> Duration {
    Duration::from_millis(2000)
}

/// Pause between the message body and the Ctrl-Z terminator
pub fn sms_body_time() -> Duration {
    Duration::from_millis(500)
}

/// GPRS attach and PDP definition settle time
pub fn attach_time() -> Duration {
    Duration::from_millis(1000)
}

/// `+CSTT` and `+CGACT` settle time
pub fn context_activation_time() -> Duration {
    Duration::from_millis(1500)
}

/// `+CIICR` wireless bring-up on newer firmware
pub fn wireless_bring_up_time() -> Duration {
    Duration::from_millis(2000)
}

/// Pause between `+CIPSTART` and `+CIPSEND`
pub fn tcp_open_time() -> Duration {
    Duration::from_millis(150)
}
