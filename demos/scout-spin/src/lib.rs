use wasm_bindgen::prelude::*;
use lab_engine::*;

mod game;
use game::ScoutSpinDemo;

lab_web::export_snippet!(ScoutSpinDemo, "scout-spin");
