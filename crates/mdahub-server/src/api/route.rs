use actix_web::{Scope, web};

pub fn routes() -> Scope {
    web::scope("/api")
        .service(
            web::scope("/auth")
                .service(super::auth::login)
                .service(super::auth::logout)
                .service(super::auth::admin_login)
                .service(super::auth::admin_logout),
        )
        .service(super::profile::get_profile)
        .service(super::profile::update_profile)
        .service(super::profile::change_password)
        .service(super::mdas::my_mda)
        .service(
            web::scope("/admin")
                .service(super::profile::admin_profile)
                .service(super::users::search_page)
                .service(super::users::create)
                .service(super::users::get)
                .service(super::users::update)
                .service(super::users::delete)
                .service(super::users::reset_password)
                .service(super::mdas::search_page)
                .service(super::mdas::create)
                .service(super::mdas::get)
                .service(super::mdas::update)
                .service(super::mdas::delete)
                .service(super::admins::search_page)
                .service(super::admins::create)
                .service(super::admins::get)
                .service(super::admins::update)
                .service(super::admins::delete)
                .service(super::admins::reset_password)
                .service(super::activities::search_page)
                .service(super::activities::export)
                .service(super::activities::cleanup)
                .service(super::export::export_users)
                .service(super::export::export_mdas)
                .service(super::export::export_combined),
        )
}
