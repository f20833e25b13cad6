fn main() {
    std::process::exit(co_drv::run());
}
