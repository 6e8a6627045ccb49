use resilient_json::decode::{decode, DecodeCallbacks};
use resilient_json::error::JsonError;

#[macro_use]
extern crate afl;

struct DiscardCallbacks;

impl DecodeCallbacks for DiscardCallbacks {
    fn on_begin_array(&mut self, _name: Option<&str>) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_begin_object(&mut self, _name: Option<&str>) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_end_container(&mut self) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_bool(&mut self, _name: Option<&str>, _value: bool) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_i64(&mut self, _name: Option<&str>, _value: i64) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_u64(&mut self, _name: Option<&str>, _value: u64) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_f64(&mut self, _name: Option<&str>, _value: f64) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_null(&mut self, _name: Option<&str>) -> Result<(), JsonError> {
        Ok(())
    }
    fn on_string(&mut self, _name: Option<&str>, _value: &str) -> Result<(), JsonError> {
        Ok(())
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut scratch = [0u8; 4096];
        let mut callbacks = DiscardCallbacks;
        // Arbitrary input must never panic, allocate, or recurse unboundedly —
        // only ever return an `Ok` or an `Err`.
        let _ = decode(data, &mut scratch, &mut callbacks);
    });
}
