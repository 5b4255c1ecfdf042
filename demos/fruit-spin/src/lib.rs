use wasm_bindgen::prelude::*;
use lab_engine::*;

mod game;
use game::FruitSpinDemo;

lab_web::export_snippet!(FruitSpinDemo, "fruit-spin");
