#[tokio::main]
async fn main() {
    loginlink::boot::boot().await;
}
