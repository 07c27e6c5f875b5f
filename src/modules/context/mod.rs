// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::CattyMailResult;

pub trait Initialize {
    async fn initialize() -> CattyMailResult<()>;
}

pub trait CattyMailTask {
    fn start();
}
