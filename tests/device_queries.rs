//! Integration tests against real mice.
//!
//! These tests require a supported Razer mouse to be connected and the
//! hidraw node to be accessible.
//! Run with: cargo test --test device_queries -- --ignored --nocapture

use razer_hal::{free_frequency_list, free_leds, free_resolution_list, RazerHal};

/// Claim the first mouse found and return its identity
fn claim_first(hal: &mut RazerHal) -> String {
    let id = hal
        .rescan()
        .expect("HID enumeration failed")
        .first()
        .map(|m| m.id().to_string())
        .expect("No mouse found - plug in a supported device");
    hal.claim(&id).expect("claim failed");
    id
}

#[test]
#[ignore] // requires hardware
fn query_everything() {
    let mut hal = RazerHal::init().expect("HID unavailable");
    let id = claim_first(&mut hal);
    let mouse = hal.device(&id).unwrap();

    println!("{} ({})", mouse.id(), mouse.mouse_type());
    println!("  firmware:    {}", mouse.firmware_version().unwrap());
    println!("  frequency:   {}", mouse.frequency().unwrap());
    println!("  resolution:  {}", mouse.resolution().unwrap());

    let freqs = mouse.supported_frequencies().unwrap();
    println!("  frequencies: {:?}", freqs.as_slice());
    free_frequency_list(freqs);

    let resolutions = mouse.supported_resolutions().unwrap();
    println!("  resolutions: {:?}", resolutions.as_slice());
    free_resolution_list(resolutions);

    let leds = mouse.leds().unwrap();
    for led in &leds {
        println!("  LED {}: {}", led.name(), led.state());
    }
    free_leds(leds);

    hal.exit();
}

#[test]
#[ignore] // requires hardware
fn resolution_round_trip_restores_original() {
    let mut hal = RazerHal::init().expect("HID unavailable");
    let id = claim_first(&mut hal);
    let mouse = hal.device(&id).unwrap();

    let original = mouse.resolution().unwrap();
    let supported = mouse.supported_resolutions().unwrap();
    for &res in supported.iter() {
        mouse.set_resolution(res).unwrap();
        assert_eq!(mouse.resolution().unwrap(), res);
    }
    if original.is_known() {
        mouse.set_resolution(original).unwrap();
    }
}
