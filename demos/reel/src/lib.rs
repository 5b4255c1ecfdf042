use wasm_bindgen::prelude::*;
use lab_engine::*;

mod game;
use game::ReelDemo;

lab_web::export_snippet!(ReelDemo, "reel");
