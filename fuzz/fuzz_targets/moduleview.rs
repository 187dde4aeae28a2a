#![no_main]

use libfuzzer_sys::fuzz_target;
use asminfo::ModuleView;

fuzz_target!(|data: &[u8]| {
    if let Ok(view) = ModuleView::from_mem(data.to_vec()) {
        if let Ok(attributes) = view.assembly_attributes(64) {
            for attribute in attributes {
                let _ = attribute.value();
            }
        }
    }
});
