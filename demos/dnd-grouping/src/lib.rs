use wasm_bindgen::prelude::*;
use lab_engine::*;

mod game;
use game::GroupingDemo;

lab_web::export_snippet!(GroupingDemo, "dnd-grouping");
