use warp::Filter;

macro_rules! include_static {
    ($($path:expr),* $(,)?) => {
        &[
            $(($path, include_str!(concat!("../static/", $path)))),*
        ]
    };
}

const STATIC_FILES: &[(&str, &str)] = include_static!["css/main.css"];

fn content_type_from_path(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("css") => "text/css; charset=utf-8",
        _ => "text/plain",
    }
}

pub fn static_file(path: &str) -> Option<(&'static str, &'static str)> {
    STATIC_FILES
        .iter()
        .find(|(file_path, _)| *file_path == path)
        .map(|(_, content)| (*content, content_type_from_path(path)))
}

pub fn build_static_routes(
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("css")
        .and(warp::path::full())
        .and(warp::get())
        .and_then(|full_path: warp::path::FullPath| async move {
            let path = full_path.as_str().trim_start_matches('/');
            match static_file(path) {
                Some((content, content_type)) => Ok::<_, warp::Rejection>(
                    warp::reply::with_header(content, "content-type", content_type),
                ),
                None => Err(warp::reject::not_found()),
            }
        })
}
