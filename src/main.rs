use cassowary::entry;
use cassowary::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
