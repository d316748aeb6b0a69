use actix_web::body::BoxBody;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder};

use crate::domain::ports::Navigator;

/// Post/redirect/get: a form submission answers with `303 See Other`, so the
/// browser follows up with a GET of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Responder for Redirect {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, self.location))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeeOtherNavigator;

impl Navigator for SeeOtherNavigator {
    type Redirect = Redirect;

    fn redirect_to(&self, path: &str) -> Redirect {
        Redirect {
            location: path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn redirect_answers_see_other_with_location() {
        let req = TestRequest::default().to_http_request();
        let resp = SeeOtherNavigator
            .redirect_to("/dashboard/invoices")
            .respond_to(&req);

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/dashboard/invoices"
        );
    }
}
