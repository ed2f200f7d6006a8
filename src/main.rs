use macroquad::prelude::*;

use cloudhop::{run, MenuScene, SceneStack};

fn window_conf() -> Conf {
    Conf {
        window_title: "Cloudhop".to_owned(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    let stack = SceneStack::new(Box::new(MenuScene::new()));
    run(stack).await;
}
